//! Single-flight simulated runs.
//!
//! A [`RunController`] moves a panel from Idle to Running when triggered and
//! hands back a [`RunTicket`]. The host sleeps for `ticket.delay` and then
//! feeds the ticket back. Timers are never cancelled: the controller decides
//! at settle time whether the ticket still belongs to the current generation
//! and the current run, and drops it otherwise.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::panels::PanelId;

/// Epoch of a panel's state. Bumped by resets and invalidations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
pub struct Generation(u64);

impl Generation {
    fn next(self) -> Self {
        Generation(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// Identifier of one triggered run within a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RunId(u64);

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run-{}", self.0)
    }
}

/// Lifecycle of a panel's run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Settled,
}

/// Which part of a run a ticket completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// The triggered run itself.
    Primary,
    /// A later batch of output belonging to an already settled run.
    FollowUp(usize),
}

/// A scheduled completion, tagged with everything needed to detect staleness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunTicket {
    pub panel: PanelId,
    pub generation: Generation,
    pub run: RunId,
    pub phase: Phase,
    #[serde(with = "duration_ms")]
    pub delay: Duration,
}

mod duration_ms {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }
}

#[derive(Debug, Clone)]
pub struct RunController {
    panel: PanelId,
    state: RunState,
    generation: Generation,
    next_run: u64,
    active: Option<RunId>,
}

impl RunController {
    pub fn new(panel: PanelId) -> Self {
        Self {
            panel,
            state: RunState::Idle,
            generation: Generation::default(),
            next_run: 0,
            active: None,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Start a run. `None` while another run is in flight.
    pub fn trigger(&mut self, delay: Duration) -> Option<RunTicket> {
        if self.is_running() {
            tracing::debug!(panel = %self.panel, "trigger ignored, run in flight");
            return None;
        }
        let run = RunId(self.next_run);
        self.next_run += 1;
        self.active = Some(run);
        self.state = RunState::Running;
        tracing::debug!(panel = %self.panel, %run, generation = %self.generation, ?delay, "run triggered");
        Some(RunTicket {
            panel: self.panel,
            generation: self.generation,
            run,
            phase: Phase::Primary,
            delay,
        })
    }

    /// Ticket for an additional output batch of `run` in the current generation.
    pub fn follow_up(&self, run: RunId, index: usize, delay: Duration) -> RunTicket {
        RunTicket {
            panel: self.panel,
            generation: self.generation,
            run,
            phase: Phase::FollowUp(index),
            delay,
        }
    }

    /// Whether `ticket` may still commit state.
    pub fn accepts(&self, ticket: &RunTicket) -> bool {
        if ticket.panel != self.panel || ticket.generation != self.generation {
            return false;
        }
        match ticket.phase {
            Phase::Primary => self.is_running() && self.active == Some(ticket.run),
            Phase::FollowUp(_) => true,
        }
    }

    /// Settle `ticket`. Returns `false` when it is stale and must be ignored.
    pub fn settle(&mut self, ticket: &RunTicket) -> bool {
        if !self.accepts(ticket) {
            tracing::debug!(
                panel = %self.panel,
                run = %ticket.run,
                ticket_generation = %ticket.generation,
                generation = %self.generation,
                "discarding stale completion"
            );
            return false;
        }
        if ticket.phase == Phase::Primary {
            self.state = RunState::Settled;
            self.active = None;
        }
        tracing::debug!(panel = %self.panel, run = %ticket.run, phase = ?ticket.phase, "run settled");
        true
    }

    /// Drop settled output. An in-flight run is invalidated.
    pub fn clear_output(&mut self) {
        match self.state {
            RunState::Running => self.reset(),
            RunState::Settled => self.state = RunState::Idle,
            RunState::Idle => {}
        }
    }

    /// Start a new generation: every outstanding ticket becomes stale.
    pub fn reset(&mut self) {
        self.generation = self.generation.next();
        self.state = RunState::Idle;
        self.active = None;
    }
}
