//! Upward reports and observable lab events.

use serde::Serialize;

use crate::panels::PanelId;

/// Callbacks a panel uses to report deltas to its container.
///
/// Panels never read container state; they only push counts upward.
pub trait Reporter {
    /// Number of scenarios found by the latest detection. `0` after a reset.
    fn report_found(&mut self, count: usize);

    /// Number of scenarios fixed, counted after the triggering update.
    fn report_fixed(&mut self, count: usize);

    /// Found/fixed counts changed; recompute derived values.
    fn report_progress_changed(&mut self);
}

/// Reporter that drops every report.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl Reporter for NoopReporter {
    fn report_found(&mut self, _count: usize) {}
    fn report_fixed(&mut self, _count: usize) {}
    fn report_progress_changed(&mut self) {}
}

/// Events emitted for observers of a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LabEvent {
    /// A simulated run was scheduled.
    RunStarted { panel: PanelId },

    /// A simulated run committed its output.
    RunSettled { panel: PanelId },

    /// A late timer fired for a run that no longer exists.
    RunDiscarded { panel: PanelId },

    /// Aggregate counters changed.
    CountersChanged {
        found: usize,
        fixed: usize,
        progress: u32,
    },

    /// Text was handed to the clipboard.
    Copied { panel: PanelId },

    /// A payload was handed to the export sink.
    Exported { file_name: String },
}
