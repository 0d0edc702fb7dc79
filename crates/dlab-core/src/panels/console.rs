//! Debug console emulator.
//!
//! Commands are looked up in the catalog's command table after trimming
//! and lower-casing. A known command's output is appended when its run
//! settles; batches declared as follow-ups arrive one follow-up delay
//! apart afterwards. `clear` is handled locally and never scheduled.
//!
//! The log is append-only between clears. Entry ids come from a counter
//! owned by the console, so they stay unique however fast entries arrive.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::catalog::{CommandSpec, ConsoleContent, Preset, ScriptedLine};
use crate::error::Result;
use crate::panels::PanelId;
use crate::run::{Phase, RunController, RunId, RunState, RunTicket};
use crate::store::ScenarioStore;
use crate::time::Timestamp;

/// Command that empties the log without a delay.
pub const CLEAR_COMMAND: &str = "clear";

/// Placeholder replaced by the user's input in unknown-command responses.
const COMMAND_PLACEHOLDER: &str = "{command}";

/// Key used for command table lookups.
pub fn normalize_command(text: &str) -> String {
    text.trim().to_lowercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    Log,
    Error,
    Warn,
    Info,
    Success,
}

impl LogKind {
    /// Upper-case label used in exports.
    pub fn label(&self) -> &'static str {
        match self {
            LogKind::Log => "LOG",
            LogKind::Error => "ERROR",
            LogKind::Warn => "WARN",
            LogKind::Info => "INFO",
            LogKind::Success => "SUCCESS",
        }
    }
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub id: u64,
    pub kind: LogKind,
    pub message: String,
    pub timestamp: Timestamp,
}

impl LogEntry {
    /// `[HH:MM:SS] KIND: message`
    pub fn render(&self) -> String {
        format!(
            "[{}] {}: {}",
            self.timestamp.to_time_string(),
            self.kind.label(),
            self.message
        )
    }
}

/// What a ticket did when fed back into the console.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleSettle {
    /// The ticket belonged to a cleared log or a finished run.
    Stale,
    /// Output appended; nothing else is pending for this run.
    Done,
    /// Output appended; the returned follow-up must be scheduled.
    Continue(RunTicket),
}

/// Response owed to a scheduled command.
#[derive(Debug, Clone)]
enum Pending {
    Known(String),
    Unknown(String),
}

#[derive(Debug, Clone)]
pub struct DebugConsole {
    commands: ScenarioStore<CommandSpec>,
    unknown: Vec<ScriptedLine>,
    presets: Vec<Preset>,
    log: Vec<LogEntry>,
    next_entry: u64,
    pending: HashMap<RunId, Pending>,
    run: RunController,
}

impl DebugConsole {
    /// Create a console with the catalog's banner already in the log.
    pub fn new(content: &ConsoleContent) -> Result<Self> {
        let mut console = Self {
            commands: ScenarioStore::from_records(content.commands.clone())?,
            unknown: content.unknown_command.clone(),
            presets: content.presets.clone(),
            log: Vec::new(),
            next_entry: 0,
            pending: HashMap::new(),
            run: RunController::new(PanelId::Console),
        };
        console.append_lines(&content.banner, None);
        Ok(console)
    }

    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    pub fn preset(&self, index: usize) -> Option<&str> {
        self.presets.get(index).map(|p| p.command.as_str())
    }

    pub fn run_state(&self) -> RunState {
        self.run.state()
    }

    pub fn is_running(&self) -> bool {
        self.run.is_running()
    }

    /// Run a command.
    ///
    /// Blank input and input arriving while a command runs are ignored.
    /// `clear` empties the log at once and drops pending follow-ups. Any
    /// other input is echoed and its response scheduled.
    pub fn execute(&mut self, input: &str, delay: Duration) -> Option<RunTicket> {
        let command = input.trim();
        if command.is_empty() {
            return None;
        }
        if self.run.is_running() {
            tracing::debug!(command, "console busy, input ignored");
            return None;
        }

        let key = normalize_command(command);
        if key == CLEAR_COMMAND {
            self.clear_log();
            return None;
        }

        let pending = if self.commands.contains(&key) {
            Pending::Known(key)
        } else {
            Pending::Unknown(command.to_string())
        };
        let ticket = self.run.trigger(delay)?;
        tracing::info!(command, run = %ticket.run, "console command");
        self.push(LogKind::Info, format!("> {command}"));
        self.pending.insert(ticket.run, pending);
        Some(ticket)
    }

    /// Append the output owed to `ticket`.
    pub fn settle(&mut self, ticket: &RunTicket, follow_up_delay: Duration) -> ConsoleSettle {
        if !self.run.settle(ticket) {
            return ConsoleSettle::Stale;
        }
        let Some(pending) = self.pending.get(&ticket.run).cloned() else {
            return ConsoleSettle::Stale;
        };

        let batch = match ticket.phase {
            Phase::Primary => 0,
            Phase::FollowUp(index) => index + 1,
        };

        match pending {
            Pending::Unknown(command) => {
                self.pending.remove(&ticket.run);
                let lines = self.unknown.clone();
                self.append_lines(&lines, Some(&command));
                ConsoleSettle::Done
            }
            Pending::Known(key) => {
                let Some(spec) = self.commands.get(&key).cloned() else {
                    self.pending.remove(&ticket.run);
                    return ConsoleSettle::Stale;
                };
                let lines = if batch == 0 {
                    spec.output.as_slice()
                } else {
                    spec.follow_ups
                        .get(batch - 1)
                        .map(Vec::as_slice)
                        .unwrap_or_default()
                };
                self.append_lines(lines, None);

                if batch < spec.follow_ups.len() {
                    ConsoleSettle::Continue(self.run.follow_up(ticket.run, batch, follow_up_delay))
                } else {
                    self.pending.remove(&ticket.run);
                    ConsoleSettle::Done
                }
            }
        }
    }

    /// Empty the log. A command in flight and its follow-ups are dropped.
    pub fn clear_log(&mut self) {
        self.log.clear();
        self.pending.clear();
        self.run.reset();
        tracing::info!(generation = %self.run.generation(), "console cleared");
    }

    /// The log as export bytes, one rendered entry per line.
    pub fn export(&self) -> Vec<u8> {
        self.log
            .iter()
            .map(LogEntry::render)
            .collect::<Vec<_>>()
            .join("\n")
            .into_bytes()
    }

    fn append_lines(&mut self, lines: &[ScriptedLine], command: Option<&str>) {
        for line in lines {
            let message = match command {
                Some(command) => line.message.replace(COMMAND_PLACEHOLDER, command),
                None => line.message.clone(),
            };
            self.push(line.kind, message);
        }
    }

    fn push(&mut self, kind: LogKind, message: String) {
        let id = self.next_entry;
        self.next_entry += 1;
        self.log.push(LogEntry {
            id,
            kind,
            message,
            timestamp: Timestamp::now(),
        });
    }
}
