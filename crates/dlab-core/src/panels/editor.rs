//! Code editor panel: buggy and fixed variants with canned run output.

use std::time::Duration;

use crate::catalog::{CodeVariant, EditorContent};
use crate::error::{Error, Result};
use crate::panels::PanelId;
use crate::run::{RunController, RunState, RunTicket};
use crate::store::ScenarioStore;

#[derive(Debug, Clone)]
pub struct CodeEditor {
    variants: ScenarioStore<CodeVariant>,
    current: String,
    output: Option<String>,
    run: RunController,
}

impl CodeEditor {
    pub fn new(content: &EditorContent) -> Result<Self> {
        let variants = ScenarioStore::from_records(content.variants.clone())?;
        let current = variants
            .get_index(0)
            .map(|v| v.id.clone())
            .ok_or_else(|| Error::InvalidCatalog("editor variants must not be empty".into()))?;
        Ok(Self {
            variants,
            current,
            output: None,
            run: RunController::new(PanelId::Editor),
        })
    }

    pub fn variants(&self) -> &ScenarioStore<CodeVariant> {
        &self.variants
    }

    pub fn current(&self) -> Option<&CodeVariant> {
        self.variants.get(&self.current)
    }

    pub fn current_id(&self) -> &str {
        &self.current
    }

    pub fn code(&self) -> &str {
        self.current().map(|v| v.code.as_str()).unwrap_or_default()
    }

    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    pub fn run_state(&self) -> RunState {
        self.run.state()
    }

    /// Switch variant. Clears the output and drops a run in flight.
    pub fn select_variant(&mut self, id: &str) -> bool {
        let id = id.to_string();
        if !self.variants.contains(&id) {
            tracing::debug!(variant = %id, "ignoring unknown variant");
            return false;
        }
        self.current = id;
        self.output = None;
        self.run.clear_output();
        true
    }

    pub fn run(&mut self, delay: Duration) -> Option<RunTicket> {
        if self.code().trim().is_empty() {
            return None;
        }
        let ticket = self.run.trigger(delay)?;
        self.output = None;
        Some(ticket)
    }

    pub fn settle(&mut self, ticket: &RunTicket) -> bool {
        if !self.run.settle(ticket) {
            return false;
        }
        self.output = self.current().map(|v| v.output.clone());
        true
    }

    /// Text handed to the clipboard by the copy button.
    pub fn copy_text(&self) -> String {
        self.code().to_string()
    }

    /// File name and bytes of the download button.
    pub fn download(&self) -> (String, Vec<u8>) {
        (
            format!("{}-code.js", self.current),
            self.code().as_bytes().to_vec(),
        )
    }
}
