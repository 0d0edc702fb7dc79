//! Messages into the dashboard and the side effects it asks the host to run.

use crate::events::LabEvent;
use crate::panels::{DetailTab, PanelId};
use crate::run::RunTicket;

/// Top-level input to [`Dashboard::update`](crate::dashboard::Dashboard::update).
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Switch the visible tab.
    SelectTab(PanelId),
    Detector(DetectorMessage),
    Editor(EditorMessage),
    Console(ConsoleMessage),
    Tools(ToolsMessage),
    Walkthrough(WalkthroughMessage),
    /// A scheduled timer fired; routed by `ticket.panel`.
    Settle(RunTicket),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetectorMessage {
    SetCode(String),
    LoadSample,
    Detect,
    Select(u32),
    Fix(u32),
    Reset,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditorMessage {
    SelectVariant(String),
    Run,
    Copy,
    Download,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleMessage {
    Execute(String),
    /// Execute the quick command at this index.
    Preset(usize),
    /// The clear button.
    ClearLog,
    Export,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ToolsMessage {
    Select(String),
    SelectTab(DetailTab),
    CopyConfig(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum WalkthroughMessage {
    Next,
    Prev,
    Jump(usize),
    Run,
    Reset,
}

/// Work the host performs after an update.
#[derive(Debug, Clone, PartialEq)]
pub enum SideEffect {
    /// Sleep for `ticket.delay`, then send `Message::Settle(ticket)`.
    Schedule(RunTicket),
    CopyToClipboard { panel: PanelId, text: String },
    Export { file_name: String, payload: Vec<u8> },
    /// Forward to session observers.
    Notify(LabEvent),
}
