//! The five lab panels.
//!
//! Each panel owns its store, selection and run controller. Panels are
//! plain state machines: they hand out [`RunTicket`](crate::run::RunTicket)s
//! and accept them back, and they push count deltas through a
//! [`Reporter`](crate::events::Reporter). Scheduling and host capabilities
//! live in [`Dashboard`](crate::dashboard::Dashboard) and
//! [`Session`](crate::session::Session).

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod console;
pub mod detector;
pub mod editor;
pub mod tools;
pub mod walkthrough;

pub use console::{ConsoleSettle, DebugConsole, LogEntry, LogKind};
pub use detector::BugDetector;
pub use editor::CodeEditor;
pub use tools::{DetailTab, ToolsPanel};
pub use walkthrough::{StepNavigator, Verdict, Walkthrough};

/// Identifies a panel; doubles as the dashboard's tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelId {
    #[default]
    Detector,
    Editor,
    Console,
    Tools,
    Walkthrough,
}

impl PanelId {
    pub const ALL: [PanelId; 5] = [
        PanelId::Detector,
        PanelId::Editor,
        PanelId::Console,
        PanelId::Tools,
        PanelId::Walkthrough,
    ];

    /// Tab caption.
    pub fn title(&self) -> &'static str {
        match self {
            PanelId::Detector => "Bug Detector",
            PanelId::Editor => "Code Editor",
            PanelId::Console => "Debug Console",
            PanelId::Tools => "Tools",
            PanelId::Walkthrough => "Demo",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PanelId::Detector => "detector",
            PanelId::Editor => "editor",
            PanelId::Console => "console",
            PanelId::Tools => "tools",
            PanelId::Walkthrough => "walkthrough",
        }
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PanelId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "detector" => Ok(PanelId::Detector),
            "editor" => Ok(PanelId::Editor),
            "console" => Ok(PanelId::Console),
            "tools" => Ok(PanelId::Tools),
            "walkthrough" | "demo" => Ok(PanelId::Walkthrough),
            other => Err(format!("unknown panel '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_id_round_trips_through_display() {
        for panel in PanelId::ALL {
            assert_eq!(panel.to_string().parse::<PanelId>(), Ok(panel));
        }
        assert_eq!("Demo".parse::<PanelId>(), Ok(PanelId::Walkthrough));
        assert!("settings".parse::<PanelId>().is_err());
    }
}
