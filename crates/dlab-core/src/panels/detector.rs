//! Bug detector panel.
//!
//! The learner edits (or keeps) the sample code and triggers a detection.
//! When the detection settles the panel loads the catalog's bug reports,
//! all unfixed, and reports the found count upward. Each report can be
//! expanded to show remediation hints and marked fixed once.

use std::time::Duration;

use crate::catalog::{BugReport, DetectorContent};
use crate::error::Result;
use crate::events::Reporter;
use crate::panels::PanelId;
use crate::run::{RunController, RunState, RunTicket};
use crate::selection::Selection;
use crate::store::ScenarioStore;

#[derive(Debug, Clone)]
pub struct BugDetector {
    code: String,
    sample: String,
    /// Reports committed by every detection, validated once at construction.
    template: ScenarioStore<BugReport>,
    bugs: ScenarioStore<BugReport>,
    selection: Selection<u32>,
    run: RunController,
}

impl BugDetector {
    pub fn new(content: &DetectorContent) -> Result<Self> {
        Ok(Self {
            code: content.sample_code.clone(),
            sample: content.sample_code.clone(),
            template: ScenarioStore::from_records(content.bugs.clone())?,
            bugs: ScenarioStore::new(),
            selection: Selection::new(),
            run: RunController::new(PanelId::Detector),
        })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn set_code(&mut self, code: impl Into<String>) {
        self.code = code.into();
    }

    /// Put the catalog sample back into the editor.
    pub fn load_sample(&mut self) {
        self.code = self.sample.clone();
    }

    pub fn bugs(&self) -> &ScenarioStore<BugReport> {
        &self.bugs
    }

    pub fn is_fixed(&self, id: u32) -> bool {
        self.bugs.is_completed(&id)
    }

    pub fn fixed_count(&self) -> usize {
        self.bugs.completed_count()
    }

    pub fn selected(&self) -> Option<&BugReport> {
        self.selection.selected().and_then(|id| self.bugs.get(id))
    }

    pub fn run_state(&self) -> RunState {
        self.run.state()
    }

    pub fn is_analyzing(&self) -> bool {
        self.run.is_running()
    }

    /// Start a detection. Blank code and a detection in flight are no-ops.
    pub fn detect(&mut self, delay: Duration) -> Option<RunTicket> {
        if self.code.trim().is_empty() {
            tracing::debug!("detection ignored, no code");
            return None;
        }
        self.run.trigger(delay)
    }

    /// Commit a detection. Returns `false` for stale tickets.
    pub fn settle(&mut self, ticket: &RunTicket, reporter: &mut dyn Reporter) -> bool {
        if !self.run.settle(ticket) {
            return false;
        }
        self.bugs = self.template.clone();
        self.selection.clear();
        tracing::info!(found = self.bugs.len(), "detection finished");
        reporter.report_found(self.bugs.len());
        reporter.report_fixed(self.bugs.completed_count());
        reporter.report_progress_changed();
        true
    }

    /// Toggle the hint view of a report.
    pub fn select(&mut self, id: u32) -> bool {
        self.selection.toggle(&id, &self.bugs)
    }

    /// Mark a report fixed. Unknown and already fixed ids are no-ops.
    pub fn fix(&mut self, id: u32, reporter: &mut dyn Reporter) -> bool {
        if !self.bugs.mark_completed(&id) {
            return false;
        }
        let fixed = self.bugs.completed_count();
        tracing::info!(bug = id, fixed, found = self.bugs.len(), "bug fixed");
        reporter.report_fixed(fixed);
        reporter.report_progress_changed();
        true
    }

    /// Forget every report and the code, and discard any detection in flight.
    pub fn reset(&mut self, reporter: &mut dyn Reporter) {
        self.bugs.clear();
        self.selection.clear();
        self.code.clear();
        self.run.reset();
        tracing::info!(generation = %self.run.generation(), "detector reset");
        reporter.report_found(0);
        reporter.report_fixed(0);
        reporter.report_progress_changed();
    }
}
