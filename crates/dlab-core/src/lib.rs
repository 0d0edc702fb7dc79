//! # Debugging Lab core
//!
//! State machines behind a teaching lab for Node.js debugging: a bug
//! detector, a code editor, a debug console emulator, a tools reference
//! and an interactive walkthrough. Nothing is executed or analyzed for
//! real; every run commits pre-authored catalog content after a delay.
//!
//! ## Architecture
//!
//! ```text
//! host (dlab-cli) ──► Session ──► Dashboard::update(Message) ──► panels
//!        ▲               │                 │
//!        │               │                 └─► Vec<SideEffect>
//!        │               └─► tokio timers ──► Message::Settle(ticket)
//!        └── Clipboard / ExportSink / LabEvent subscribers
//! ```
//!
//! ## Core Components
//!
//! - [`Catalog`]: lesson content, built in or loaded from YAML/JSON
//! - [`RunController`]: single-flight runs with generation-tagged tickets
//! - [`ScenarioStore`] and [`Selection`]: per-panel records and detail views
//! - [`Counters`]: found/fixed aggregate and progress percentage
//! - [`Dashboard`]: the container owning the panels and counters
//! - [`Session`]: async driver executing side effects on tokio
//! - [`LabConfig`]: delays, logging and export settings

pub mod catalog;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod events;
pub mod logging;
pub mod message;
pub mod panels;
pub mod progress;
pub mod run;
pub mod selection;
pub mod session;
pub mod store;
pub mod time;

pub use catalog::Catalog;
pub use config::{ConfigManager, ExportConfig, LabConfig, LoggingConfig, TimingConfig};
pub use dashboard::{Dashboard, Summary};
pub use error::{Error, Result};
pub use events::{LabEvent, NoopReporter, Reporter};
pub use message::{
    ConsoleMessage, DetectorMessage, EditorMessage, Message, SideEffect, ToolsMessage,
    WalkthroughMessage,
};
pub use panels::PanelId;
pub use progress::{compute_progress, Counters};
pub use run::{Generation, Phase, RunController, RunId, RunState, RunTicket};
pub use selection::Selection;
pub use session::{Clipboard, ExportSink, Session, SessionId};
pub use store::{Scenario, ScenarioStore};
pub use time::Timestamp;
