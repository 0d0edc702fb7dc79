//! Debugging tools reference panel.

use serde::{Deserialize, Serialize};

use crate::catalog::{AdditionalTool, ConfigSnippet, Tool, ToolsContent};
use crate::error::Result;
use crate::selection::Selection;
use crate::store::ScenarioStore;

/// Tab of the selected tool's detail view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailTab {
    #[default]
    Overview,
    Usage,
    Config,
}

#[derive(Debug, Clone)]
pub struct ToolsPanel {
    tools: ScenarioStore<Tool>,
    configurations: ScenarioStore<ConfigSnippet>,
    additional: Vec<AdditionalTool>,
    selection: Selection<String>,
    tab: DetailTab,
}

impl ToolsPanel {
    pub fn new(content: &ToolsContent) -> Result<Self> {
        Ok(Self {
            tools: ScenarioStore::from_records(content.tools.clone())?,
            configurations: ScenarioStore::from_records(content.configurations.clone())?,
            additional: content.additional.clone(),
            selection: Selection::new(),
            tab: DetailTab::Overview,
        })
    }

    pub fn tools(&self) -> &ScenarioStore<Tool> {
        &self.tools
    }

    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }

    pub fn additional(&self) -> &[AdditionalTool] {
        &self.additional
    }

    pub fn configuration(&self, name: &str) -> Option<&ConfigSnippet> {
        self.configurations.get(&name.to_string())
    }

    pub fn selected(&self) -> Option<&Tool> {
        self.selection.selected().and_then(|id| self.tools.get(id))
    }

    pub fn tab(&self) -> DetailTab {
        self.tab
    }

    /// Toggle a tool's detail view. A changed selection opens on the overview.
    pub fn select(&mut self, id: &str) -> bool {
        let changed = self.selection.toggle(&id.to_string(), &self.tools);
        if changed {
            self.tab = DetailTab::Overview;
        }
        changed
    }

    /// Switch the detail tab. Ignored while no tool is selected.
    pub fn select_tab(&mut self, tab: DetailTab) -> bool {
        if self.selected().is_none() {
            return false;
        }
        self.tab = tab;
        true
    }

    /// Snippets referenced by the selected tool, in reference order.
    pub fn selected_configurations(&self) -> Vec<&ConfigSnippet> {
        self.selected()
            .map(|tool| {
                tool.configs
                    .iter()
                    .filter_map(|name| self.configuration(name))
                    .collect()
            })
            .unwrap_or_default()
    }
}
