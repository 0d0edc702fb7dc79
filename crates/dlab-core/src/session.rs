//! Async session driver.
//!
//! The [`Session`] owns a [`Dashboard`] and executes the side effects its
//! updates return. Scheduled runs become tokio timers that send their
//! ticket back over a channel; [`Session::settle_next`] feeds the next
//! fired ticket into the dashboard. All state mutation happens on the task
//! that drives the session.
//!
//! # Example
//!
//! ```ignore
//! let catalog = Catalog::builtin()?;
//! let mut session = Session::new(&catalog, &LabConfig::default(), clipboard, exporter)?;
//!
//! session.dispatch(Message::Detector(DetectorMessage::Detect))?;
//! session.run_until_idle().await?;
//! assert_eq!(session.dashboard().summary().bugs_found, 4);
//! ```

use std::fmt;

use tokio::sync::{broadcast, mpsc};
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::config::LabConfig;
use crate::dashboard::Dashboard;
use crate::error::{Error, Result};
use crate::events::LabEvent;
use crate::message::{Message, SideEffect};
use crate::run::RunTicket;

/// Capacity of the observer channel. Slow observers miss old events.
const EVENT_CAPACITY: usize = 256;

/// Host clipboard.
pub trait Clipboard: Send {
    fn copy(&mut self, text: &str) -> Result<()>;
}

/// Host download target.
pub trait ExportSink: Send {
    fn save(&mut self, file_name: &str, payload: &[u8]) -> Result<()>;
}

/// Identifier attached to a session's log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub struct Session {
    id: SessionId,
    dashboard: Dashboard,
    clipboard: Box<dyn Clipboard>,
    exporter: Box<dyn ExportSink>,
    timer_tx: mpsc::UnboundedSender<RunTicket>,
    timer_rx: mpsc::UnboundedReceiver<RunTicket>,
    outstanding: usize,
    events: broadcast::Sender<LabEvent>,
}

impl Session {
    pub fn new(
        catalog: &Catalog,
        config: &LabConfig,
        clipboard: impl Clipboard + 'static,
        exporter: impl ExportSink + 'static,
    ) -> Result<Self> {
        let dashboard = Dashboard::new(catalog, config)?;
        let (timer_tx, timer_rx) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let id = SessionId::new();
        tracing::info!(session = %id, "session started");
        Ok(Self {
            id,
            dashboard,
            clipboard: Box::new(clipboard),
            exporter: Box::new(exporter),
            timer_tx,
            timer_rx,
            outstanding: 0,
            events,
        })
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    /// Subscribe to lab events emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<LabEvent> {
        self.events.subscribe()
    }

    /// Timers scheduled but not yet settled.
    pub fn pending_timers(&self) -> usize {
        self.outstanding
    }

    /// Apply `msg` and execute its effects.
    ///
    /// Must be called from within a tokio runtime when a delay is non-zero.
    /// A failing capability does not stop the remaining effects; the first
    /// failure is returned.
    pub fn dispatch(&mut self, msg: Message) -> Result<()> {
        let effects = self.dashboard.update(msg);
        self.execute(effects)
    }

    /// Wait for the next timer and settle it. `Ok(false)` when none is pending.
    pub async fn settle_next(&mut self) -> Result<bool> {
        if self.outstanding == 0 {
            return Ok(false);
        }
        let ticket = self.timer_rx.recv().await.ok_or(Error::ChannelClosed)?;
        self.outstanding -= 1;
        let effects = self.dashboard.update(Message::Settle(ticket));
        self.execute(effects)?;
        Ok(true)
    }

    /// Settle timers until none is pending, including follow-ups scheduled
    /// along the way.
    pub async fn run_until_idle(&mut self) -> Result<()> {
        while self.settle_next().await? {}
        Ok(())
    }

    fn execute(&mut self, effects: Vec<SideEffect>) -> Result<()> {
        let mut first_error = None;
        for effect in effects {
            if let Err(err) = self.execute_one(effect) {
                tracing::warn!(session = %self.id, error = %err, "side effect failed");
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn execute_one(&mut self, effect: SideEffect) -> Result<()> {
        match effect {
            SideEffect::Schedule(ticket) => {
                self.schedule(ticket);
                Ok(())
            }
            SideEffect::CopyToClipboard { panel, text } => {
                self.clipboard.copy(&text)?;
                tracing::debug!(session = %self.id, %panel, bytes = text.len(), "copied");
                self.notify(LabEvent::Copied { panel });
                Ok(())
            }
            SideEffect::Export { file_name, payload } => {
                self.exporter.save(&file_name, &payload)?;
                tracing::info!(session = %self.id, file = %file_name, bytes = payload.len(), "exported");
                self.notify(LabEvent::Exported { file_name });
                Ok(())
            }
            SideEffect::Notify(event) => {
                self.notify(event);
                Ok(())
            }
        }
    }

    fn schedule(&mut self, ticket: RunTicket) {
        self.outstanding += 1;
        if ticket.delay.is_zero() {
            // Receiver lives in `self`, so the send cannot fail here.
            let _ = self.timer_tx.send(ticket);
            return;
        }
        let tx = self.timer_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(ticket.delay).await;
            // The session may be gone by now; a dropped ticket is fine.
            let _ = tx.send(ticket);
        });
    }

    fn notify(&self, event: LabEvent) {
        // No subscribers is not an error.
        let _ = self.events.send(event);
    }
}
