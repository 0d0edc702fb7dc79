//! Interactive walkthrough ("Demo" tab).
//!
//! A [`StepNavigator`] walks a fixed list of steps. Running a step shows
//! its expected output after the walkthrough delay and marks the step
//! completed. Completion survives navigation; only [`Walkthrough::reset`]
//! clears it.

use std::time::Duration;

use serde::Serialize;

use crate::catalog::{Outcome, Step, WalkthroughContent};
use crate::error::{Error, Result};
use crate::panels::PanelId;
use crate::progress::compute_progress;
use crate::run::{RunController, RunState, RunTicket};
use crate::store::ScenarioStore;

/// Cursor over `len` steps, always inside `0..len`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepNavigator {
    len: usize,
    current: usize,
}

impl StepNavigator {
    /// `len` must be at least one.
    pub fn new(len: usize) -> Self {
        Self {
            len: len.max(1),
            current: 0,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn step_count(&self) -> usize {
        self.len
    }

    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 == self.len
    }

    pub fn next(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.current += 1;
        true
    }

    pub fn prev(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Move to `index`. Out-of-range indices are ignored.
    pub fn jump(&mut self, index: usize) -> bool {
        if index >= self.len {
            return false;
        }
        self.current = index;
        true
    }

    pub fn reset(&mut self) {
        self.current = 0;
    }
}

/// Verdict shown beside a step's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    BugDetected,
    BugFixed,
}

impl From<Outcome> for Verdict {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Bug => Verdict::BugDetected,
            Outcome::Fixed => Verdict::BugFixed,
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::BugDetected => write!(f, "Bug detected"),
            Verdict::BugFixed => write!(f, "Bug fixed"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Walkthrough {
    steps: ScenarioStore<Step>,
    nav: StepNavigator,
    output: Option<String>,
    run: RunController,
}

impl Walkthrough {
    pub fn new(content: &WalkthroughContent) -> Result<Self> {
        let steps = ScenarioStore::from_records(content.steps.clone())?;
        if steps.is_empty() {
            return Err(Error::InvalidCatalog(
                "walkthrough steps must not be empty".into(),
            ));
        }
        Ok(Self {
            nav: StepNavigator::new(steps.len()),
            steps,
            output: None,
            run: RunController::new(PanelId::Walkthrough),
        })
    }

    pub fn steps(&self) -> &ScenarioStore<Step> {
        &self.steps
    }

    pub fn navigator(&self) -> &StepNavigator {
        &self.nav
    }

    pub fn current_index(&self) -> usize {
        self.nav.current()
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.steps.get_index(self.nav.current())
    }

    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    pub fn run_state(&self) -> RunState {
        self.run.state()
    }

    /// Verdict of the current step, once its output is shown.
    pub fn verdict(&self) -> Option<Verdict> {
        self.output.as_ref()?;
        self.current_step().map(|s| s.outcome.into())
    }

    pub fn is_step_completed(&self, index: usize) -> bool {
        self.steps
            .get_index(index)
            .is_some_and(|s| self.steps.is_completed(&s.id))
    }

    pub fn completed_count(&self) -> usize {
        self.steps.completed_count()
    }

    /// Completed steps as a percentage of all steps.
    pub fn progress(&self) -> f64 {
        compute_progress(self.steps.len(), self.steps.completed_count())
    }

    pub fn next(&mut self) -> bool {
        let moved = self.nav.next();
        self.after_move(moved)
    }

    pub fn prev(&mut self) -> bool {
        let moved = self.nav.prev();
        self.after_move(moved)
    }

    pub fn jump(&mut self, index: usize) -> bool {
        let moved = self.nav.jump(index);
        self.after_move(moved)
    }

    fn after_move(&mut self, moved: bool) -> bool {
        if moved {
            self.output = None;
            self.run.clear_output();
            tracing::debug!(step = self.nav.current(), "walkthrough moved");
        }
        moved
    }

    pub fn run(&mut self, delay: Duration) -> Option<RunTicket> {
        let ticket = self.run.trigger(delay)?;
        self.output = None;
        Some(ticket)
    }

    pub fn settle(&mut self, ticket: &RunTicket) -> bool {
        if !self.run.settle(ticket) {
            return false;
        }
        let Some(step) = self.current_step() else {
            return false;
        };
        let (id, output) = (step.id, step.expected_output.clone());
        self.output = Some(output);
        if self.steps.mark_completed(&id) {
            tracing::info!(step = id, completed = self.steps.completed_count(), "step completed");
        }
        true
    }

    /// Back to the first step with nothing completed.
    pub fn reset(&mut self) {
        self.nav.reset();
        self.output = None;
        self.steps.reset_completion();
        self.run.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    const DELAY: Duration = Duration::from_millis(2000);

    fn walkthrough() -> Walkthrough {
        Walkthrough::new(&Catalog::builtin().unwrap().walkthrough).unwrap()
    }

    fn run_current(w: &mut Walkthrough) {
        let ticket = w.run(DELAY).unwrap();
        assert!(w.settle(&ticket));
    }

    #[test]
    fn test_navigator_bounds() {
        let mut nav = StepNavigator::new(4);
        assert!(!nav.prev());
        assert!(nav.jump(3));
        assert!(!nav.next());
        assert_eq!(nav.current(), 3);
        assert!(!nav.jump(4));
        assert_eq!(nav.current(), 3);
        assert!(nav.prev());
        assert_eq!(nav.current(), 2);
    }

    #[test]
    fn test_single_step_navigator() {
        let mut nav = StepNavigator::new(1);
        assert!(nav.is_first() && nav.is_last());
        assert!(!nav.next());
        assert!(!nav.prev());
    }

    #[test]
    fn test_run_shows_output_and_verdict() {
        let mut w = walkthrough();
        assert!(w.verdict().is_none());
        run_current(&mut w);
        assert!(w.output().unwrap().contains("undefined"));
        assert_eq!(w.verdict(), Some(Verdict::BugDetected));
        assert!(w.is_step_completed(0));
        assert_eq!(w.progress(), 25.0);

        w.next();
        run_current(&mut w);
        assert_eq!(w.verdict(), Some(Verdict::BugFixed));
    }

    #[test]
    fn test_navigation_clears_output_but_keeps_completion() {
        let mut w = walkthrough();
        run_current(&mut w);
        assert!(w.jump(2));
        assert!(w.output().is_none());
        assert_eq!(w.run_state(), RunState::Idle);
        assert!(w.prev());
        assert!(w.is_step_completed(0));
    }

    #[test]
    fn test_rejected_navigation_keeps_output() {
        let mut w = walkthrough();
        run_current(&mut w);
        assert!(!w.prev());
        assert!(!w.jump(10));
        assert!(w.output().is_some());
    }

    #[test]
    fn test_run_interrupted_by_navigation_is_discarded() {
        let mut w = walkthrough();
        let ticket = w.run(DELAY).unwrap();
        w.next();
        assert!(!w.settle(&ticket));
        assert_eq!(w.completed_count(), 0);
        assert!(w.output().is_none());
    }

    #[test]
    fn test_rerunning_a_step_counts_once() {
        let mut w = walkthrough();
        run_current(&mut w);
        run_current(&mut w);
        assert_eq!(w.completed_count(), 1);
    }

    #[test]
    fn test_rerun_hides_previous_verdict() {
        let mut w = walkthrough();
        run_current(&mut w);
        assert!(w.verdict().is_some());

        let ticket = w.run(DELAY).unwrap();
        assert_eq!(w.run_state(), RunState::Running);
        assert!(w.output().is_none());
        assert!(w.verdict().is_none());
        assert!(w.settle(&ticket));
        assert_eq!(w.verdict(), Some(Verdict::BugDetected));
    }

    #[test]
    fn test_reset() {
        let mut w = walkthrough();
        run_current(&mut w);
        w.jump(3);
        let late = w.run(DELAY).unwrap();

        w.reset();
        assert!(!w.settle(&late));
        assert_eq!(w.current_index(), 0);
        assert_eq!(w.completed_count(), 0);
        assert_eq!(w.progress(), 0.0);
        assert!(w.output().is_none());
    }
}
