//! Lesson content catalog.
//!
//! All pedagogical content is data: sample code, bug reports, canned run
//! output, the console command table, tool descriptions and walkthrough
//! steps. The built-in catalog is `data/catalog.yaml`; hosts may load their
//! own from YAML or JSON. Panels never inspect payload text; they only
//! look records up by id or, for the console, by normalized command.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::panels::console::{normalize_command, LogKind, CLEAR_COMMAND};
use crate::store::{Scenario, ScenarioStore};

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.yaml");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub detector: DetectorContent,
    pub editor: EditorContent,
    pub console: ConsoleContent,
    pub tools: ToolsContent,
    pub walkthrough: WalkthroughContent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorContent {
    /// Code preloaded into the detector's editable input.
    pub sample_code: String,
    /// Reports produced by a detection run, in display order.
    pub bugs: Vec<BugReport>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::High => write!(f, "HIGH"),
            Severity::Medium => write!(f, "MEDIUM"),
            Severity::Low => write!(f, "LOW"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BugReport {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub line: u32,
    pub severity: Severity,
    pub description: String,
    /// Remediation hints shown while the report is selected.
    #[serde(default)]
    pub hints: Vec<String>,
}

impl Scenario for BugReport {
    type Id = u32;
    const STORE: &'static str = "detector bugs";

    fn id(&self) -> &u32 {
        &self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorContent {
    pub variants: Vec<CodeVariant>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeVariant {
    pub id: String,
    pub label: String,
    pub code: String,
    /// Canned output of a simulated run.
    pub output: String,
}

impl Scenario for CodeVariant {
    type Id = String;
    const STORE: &'static str = "editor variants";

    fn id(&self) -> &String {
        &self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleContent {
    /// Entries appended when a console is created.
    #[serde(default)]
    pub banner: Vec<ScriptedLine>,
    /// Response to an unknown command. `{command}` is replaced by the input.
    pub unknown_command: Vec<ScriptedLine>,
    #[serde(default)]
    pub presets: Vec<Preset>,
    pub commands: Vec<CommandSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptedLine {
    pub kind: LogKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub label: String,
    pub command: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandSpec {
    /// Normalized command text (trimmed, lower case).
    pub command: String,
    pub output: Vec<ScriptedLine>,
    /// Further batches, each appended one follow-up delay after the previous.
    #[serde(default)]
    pub follow_ups: Vec<Vec<ScriptedLine>>,
}

impl Scenario for CommandSpec {
    type Id = String;
    const STORE: &'static str = "console commands";

    fn id(&self) -> &String {
        &self.command
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsContent {
    pub tools: Vec<Tool>,
    #[serde(default)]
    pub configurations: Vec<ConfigSnippet>,
    #[serde(default)]
    pub additional: Vec<AdditionalTool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub methods: Vec<ToolMethod>,
    #[serde(default)]
    pub commands: Vec<ToolCommand>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub usage: Vec<String>,
    /// Names of configuration snippets shown on the config tab.
    #[serde(default)]
    pub configs: Vec<String>,
}

impl Scenario for Tool {
    type Id = String;
    const STORE: &'static str = "tools";

    fn id(&self) -> &String {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolMethod {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCommand {
    pub command: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigSnippet {
    pub name: String,
    pub title: String,
    pub body: String,
}

impl Scenario for ConfigSnippet {
    type Id = String;
    const STORE: &'static str = "configuration snippets";

    fn id(&self) -> &String {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionalTool {
    pub name: String,
    pub description: String,
    pub installation: String,
    pub usage: String,
    #[serde(default)]
    pub features: Vec<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalkthroughContent {
    pub steps: Vec<Step>,
}

/// What a walkthrough step's output demonstrates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// The output exposes a bug.
    Bug,
    /// The output shows the corrected behavior.
    Fixed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub code: String,
    pub expected_output: String,
    pub bug_type: String,
    pub outcome: Outcome,
}

impl Scenario for Step {
    type Id = u32;
    const STORE: &'static str = "walkthrough steps";

    fn id(&self) -> &u32 {
        &self.id
    }
}

impl Catalog {
    /// The catalog shipped with the crate.
    pub fn builtin() -> Result<Self> {
        Self::parse_yaml(BUILTIN_CATALOG, Path::new("<builtin>"))
    }

    /// Load a catalog file. `.json` is parsed as JSON, anything else as YAML.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::parse_json(&data, path),
            _ => Self::parse_yaml(&data, path),
        }
    }

    fn parse_yaml(src: &str, path: &Path) -> Result<Self> {
        let catalog: Catalog = serde_yaml::from_str(src).map_err(|e| Error::CatalogParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        catalog.validate()?;
        Ok(catalog)
    }

    fn parse_json(src: &str, path: &Path) -> Result<Self> {
        let catalog: Catalog = serde_json::from_str(src).map_err(|e| Error::CatalogParse {
            path: PathBuf::from(path),
            message: e.to_string(),
        })?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check the structural rules the panels rely on.
    pub fn validate(&self) -> Result<()> {
        non_empty("detector bugs", self.detector.bugs.len())?;
        ScenarioStore::from_records(self.detector.bugs.clone())?;

        non_empty("editor variants", self.editor.variants.len())?;
        ScenarioStore::from_records(self.editor.variants.clone())?;

        non_empty("console unknown_command", self.console.unknown_command.len())?;
        for spec in &self.console.commands {
            if spec.command != normalize_command(&spec.command) || spec.command.is_empty() {
                return Err(Error::InvalidCatalog(format!(
                    "console command '{}' must be trimmed lower case",
                    spec.command
                )));
            }
            if spec.command == CLEAR_COMMAND {
                return Err(Error::InvalidCatalog(format!(
                    "console command '{CLEAR_COMMAND}' is built in"
                )));
            }
        }
        ScenarioStore::from_records(self.console.commands.clone())?;

        ScenarioStore::from_records(self.tools.tools.clone())?;
        let snippets: HashSet<&str> = self
            .tools
            .configurations
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        ScenarioStore::from_records(self.tools.configurations.clone())?;
        for tool in &self.tools.tools {
            if let Some(missing) = tool.configs.iter().find(|c| !snippets.contains(c.as_str())) {
                return Err(Error::InvalidCatalog(format!(
                    "tool '{}' references unknown configuration '{}'",
                    tool.id, missing
                )));
            }
        }

        non_empty("walkthrough steps", self.walkthrough.steps.len())?;
        ScenarioStore::from_records(self.walkthrough.steps.clone())?;
        Ok(())
    }
}

fn non_empty(what: &str, len: usize) -> Result<()> {
    if len == 0 {
        Err(Error::InvalidCatalog(format!("{what} must not be empty")))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.detector.bugs.len(), 4);
        assert_eq!(catalog.editor.variants.len(), 2);
        assert_eq!(catalog.tools.tools.len(), 4);
        assert_eq!(catalog.walkthrough.steps.len(), 4);
        assert!(catalog.console.commands.iter().any(|c| c.command == "help"));
    }

    #[test]
    fn builtin_bug_reports_are_ordered_by_id() {
        let catalog = Catalog::builtin().unwrap();
        let ids: Vec<u32> = catalog.detector.bugs.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(catalog.detector.bugs[0].severity, Severity::High);
        assert_eq!(catalog.detector.bugs[0].hints.len(), 2);
    }

    #[test]
    fn npm_test_has_a_follow_up_batch() {
        let catalog = Catalog::builtin().unwrap();
        let npm = catalog
            .console
            .commands
            .iter()
            .find(|c| c.command == "npm test")
            .unwrap();
        assert_eq!(npm.output.len(), 1);
        assert_eq!(npm.follow_ups.len(), 1);
        assert_eq!(npm.follow_ups[0].len(), 3);
    }

    #[test]
    fn duplicate_bug_ids_are_rejected() {
        let mut catalog = Catalog::builtin().unwrap();
        let dup = catalog.detector.bugs[0].clone();
        catalog.detector.bugs.push(dup);
        assert!(matches!(
            catalog.validate(),
            Err(Error::DuplicateId {
                store: "detector bugs",
                ..
            })
        ));
    }

    #[test]
    fn clear_cannot_be_redefined() {
        let mut catalog = Catalog::builtin().unwrap();
        catalog.console.commands.push(CommandSpec {
            command: "clear".into(),
            output: vec![],
            follow_ups: vec![],
        });
        assert!(matches!(catalog.validate(), Err(Error::InvalidCatalog(_))));
    }

    #[test]
    fn commands_must_be_normalized() {
        let mut catalog = Catalog::builtin().unwrap();
        catalog.console.commands[0].command = "Node --Inspect app.js".into();
        assert!(matches!(catalog.validate(), Err(Error::InvalidCatalog(_))));
    }

    #[test]
    fn unknown_configuration_reference_is_rejected() {
        let mut catalog = Catalog::builtin().unwrap();
        catalog.tools.tools[0].configs.push("webpack".into());
        let err = catalog.validate().unwrap_err();
        assert!(err.to_string().contains("webpack"));
    }

    #[test]
    fn empty_walkthrough_is_rejected() {
        let mut catalog = Catalog::builtin().unwrap();
        catalog.walkthrough.steps.clear();
        assert!(matches!(catalog.validate(), Err(Error::InvalidCatalog(_))));
    }

    #[test]
    fn loads_json_by_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        let json = serde_json::to_string(&Catalog::builtin().unwrap()).unwrap();
        fs::write(&path, json).unwrap();

        let catalog = Catalog::load_from_path(&path).unwrap();
        assert_eq!(catalog.detector.bugs.len(), 4);
    }

    #[test]
    fn parse_error_names_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.yaml");
        fs::write(&path, "detector: [unclosed").unwrap();

        let err = Catalog::load_from_path(&path).unwrap_err();
        assert!(err.to_string().contains("broken.yaml"));
    }
}
