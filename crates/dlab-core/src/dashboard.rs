//! The dashboard container.
//!
//! Owns the five panels, the active tab and the aggregate counters, and
//! implements the update half of the message loop. Updates are pure state
//! transitions: anything that needs time or the host comes back as a
//! [`SideEffect`].

use serde::Serialize;

use crate::catalog::Catalog;
use crate::config::{ExportConfig, LabConfig, TimingConfig};
use crate::error::Result;
use crate::events::LabEvent;
use crate::message::{
    ConsoleMessage, DetectorMessage, EditorMessage, Message, SideEffect, ToolsMessage,
    WalkthroughMessage,
};
use crate::panels::{
    BugDetector, CodeEditor, ConsoleSettle, DebugConsole, PanelId, ToolsPanel, Walkthrough,
};
use crate::progress::Counters;
use crate::run::RunTicket;

/// Header statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub bugs_found: usize,
    pub bugs_fixed: usize,
    pub tools: usize,
    /// Rounded percentage.
    pub progress: u32,
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    active: PanelId,
    counters: Counters,
    timing: TimingConfig,
    export: ExportConfig,
    detector: BugDetector,
    editor: CodeEditor,
    console: DebugConsole,
    tools: ToolsPanel,
    walkthrough: Walkthrough,
}

impl Dashboard {
    pub fn new(catalog: &Catalog, config: &LabConfig) -> Result<Self> {
        Ok(Self {
            active: PanelId::default(),
            counters: Counters::new(),
            timing: config.timing.clone(),
            export: config.export.clone(),
            detector: BugDetector::new(&catalog.detector)?,
            editor: CodeEditor::new(&catalog.editor)?,
            console: DebugConsole::new(&catalog.console)?,
            tools: ToolsPanel::new(&catalog.tools)?,
            walkthrough: Walkthrough::new(&catalog.walkthrough)?,
        })
    }

    pub fn active_tab(&self) -> PanelId {
        self.active
    }

    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    pub fn summary(&self) -> Summary {
        Summary {
            bugs_found: self.counters.found,
            bugs_fixed: self.counters.fixed,
            tools: self.tools.tool_count(),
            progress: self.counters.progress_rounded(),
        }
    }

    pub fn detector(&self) -> &BugDetector {
        &self.detector
    }

    pub fn editor(&self) -> &CodeEditor {
        &self.editor
    }

    pub fn console(&self) -> &DebugConsole {
        &self.console
    }

    pub fn tools(&self) -> &ToolsPanel {
        &self.tools
    }

    pub fn walkthrough(&self) -> &Walkthrough {
        &self.walkthrough
    }

    /// Apply one message and collect the resulting effects.
    pub fn update(&mut self, msg: Message) -> Vec<SideEffect> {
        let before = self.counters;
        let mut effects = Vec::new();

        match msg {
            Message::SelectTab(panel) => {
                self.active = panel;
            }
            Message::Detector(msg) => self.update_detector(msg, &mut effects),
            Message::Editor(msg) => self.update_editor(msg, &mut effects),
            Message::Console(msg) => self.update_console(msg, &mut effects),
            Message::Tools(msg) => self.update_tools(msg, &mut effects),
            Message::Walkthrough(msg) => self.update_walkthrough(msg, &mut effects),
            Message::Settle(ticket) => self.settle(ticket, &mut effects),
        }

        if self.counters != before {
            effects.push(SideEffect::Notify(LabEvent::CountersChanged {
                found: self.counters.found,
                fixed: self.counters.fixed,
                progress: self.counters.progress_rounded(),
            }));
        }
        effects
    }

    fn update_detector(&mut self, msg: DetectorMessage, effects: &mut Vec<SideEffect>) {
        match msg {
            DetectorMessage::SetCode(code) => self.detector.set_code(code),
            DetectorMessage::LoadSample => self.detector.load_sample(),
            DetectorMessage::Detect => {
                schedule(effects, self.detector.detect(self.timing.detector()));
            }
            DetectorMessage::Select(id) => {
                self.detector.select(id);
            }
            DetectorMessage::Fix(id) => {
                self.detector.fix(id, &mut self.counters);
            }
            DetectorMessage::Reset => self.detector.reset(&mut self.counters),
        }
    }

    fn update_editor(&mut self, msg: EditorMessage, effects: &mut Vec<SideEffect>) {
        match msg {
            EditorMessage::SelectVariant(id) => {
                self.editor.select_variant(&id);
            }
            EditorMessage::Run => schedule(effects, self.editor.run(self.timing.editor())),
            EditorMessage::Copy => effects.push(SideEffect::CopyToClipboard {
                panel: PanelId::Editor,
                text: self.editor.copy_text(),
            }),
            EditorMessage::Download => {
                let (file_name, payload) = self.editor.download();
                effects.push(SideEffect::Export { file_name, payload });
            }
        }
    }

    fn update_console(&mut self, msg: ConsoleMessage, effects: &mut Vec<SideEffect>) {
        match msg {
            ConsoleMessage::Execute(input) => {
                schedule(effects, self.console.execute(&input, self.timing.console()));
            }
            ConsoleMessage::Preset(index) => {
                if let Some(command) = self.console.preset(index).map(str::to_string) {
                    schedule(effects, self.console.execute(&command, self.timing.console()));
                }
            }
            ConsoleMessage::ClearLog => self.console.clear_log(),
            ConsoleMessage::Export => effects.push(SideEffect::Export {
                file_name: self.export.console_file.clone(),
                payload: self.console.export(),
            }),
        }
    }

    fn update_tools(&mut self, msg: ToolsMessage, effects: &mut Vec<SideEffect>) {
        match msg {
            ToolsMessage::Select(id) => {
                self.tools.select(&id);
            }
            ToolsMessage::SelectTab(tab) => {
                self.tools.select_tab(tab);
            }
            ToolsMessage::CopyConfig(name) => match self.tools.configuration(&name) {
                Some(snippet) => effects.push(SideEffect::CopyToClipboard {
                    panel: PanelId::Tools,
                    text: snippet.body.clone(),
                }),
                None => tracing::debug!(config = %name, "ignoring unknown configuration"),
            },
        }
    }

    fn update_walkthrough(&mut self, msg: WalkthroughMessage, effects: &mut Vec<SideEffect>) {
        match msg {
            WalkthroughMessage::Next => {
                self.walkthrough.next();
            }
            WalkthroughMessage::Prev => {
                self.walkthrough.prev();
            }
            WalkthroughMessage::Jump(index) => {
                self.walkthrough.jump(index);
            }
            WalkthroughMessage::Run => {
                schedule(effects, self.walkthrough.run(self.timing.walkthrough()));
            }
            WalkthroughMessage::Reset => self.walkthrough.reset(),
        }
    }

    fn settle(&mut self, ticket: RunTicket, effects: &mut Vec<SideEffect>) {
        let panel = ticket.panel;
        let committed = match panel {
            PanelId::Detector => self.detector.settle(&ticket, &mut self.counters),
            PanelId::Editor => self.editor.settle(&ticket),
            PanelId::Walkthrough => self.walkthrough.settle(&ticket),
            PanelId::Console => {
                match self
                    .console
                    .settle(&ticket, self.timing.console_follow_up())
                {
                    ConsoleSettle::Stale => false,
                    ConsoleSettle::Done => true,
                    ConsoleSettle::Continue(next) => {
                        effects.push(SideEffect::Schedule(next));
                        true
                    }
                }
            }
            PanelId::Tools => false,
        };

        let event = if committed {
            LabEvent::RunSettled { panel }
        } else {
            tracing::debug!(%panel, run = %ticket.run, "completion discarded");
            LabEvent::RunDiscarded { panel }
        };
        effects.push(SideEffect::Notify(event));
    }
}

fn schedule(effects: &mut Vec<SideEffect>, ticket: Option<RunTicket>) {
    if let Some(ticket) = ticket {
        effects.push(SideEffect::Notify(LabEvent::RunStarted {
            panel: ticket.panel,
        }));
        effects.push(SideEffect::Schedule(ticket));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dashboard() -> Dashboard {
        Dashboard::new(&Catalog::builtin().unwrap(), &LabConfig::default()).unwrap()
    }

    fn tickets(effects: &[SideEffect]) -> Vec<RunTicket> {
        effects
            .iter()
            .filter_map(|e| match e {
                SideEffect::Schedule(t) => Some(t.clone()),
                _ => None,
            })
            .collect()
    }

    fn detect(d: &mut Dashboard) {
        let effects = d.update(Message::Detector(DetectorMessage::Detect));
        let ticket = tickets(&effects).pop().unwrap();
        d.update(Message::Settle(ticket));
    }

    #[test]
    fn test_detect_fix_reset_flow() {
        let mut d = dashboard();
        assert_eq!(d.summary().bugs_found, 0);
        assert_eq!(d.summary().tools, 4);

        detect(&mut d);
        assert_eq!(d.summary().bugs_found, 4);

        d.update(Message::Detector(DetectorMessage::Fix(1)));
        assert_eq!(d.summary().progress, 25);
        d.update(Message::Detector(DetectorMessage::Fix(2)));
        assert_eq!(d.summary().progress, 50);

        d.update(Message::Detector(DetectorMessage::Reset));
        let s = d.summary();
        assert_eq!((s.bugs_found, s.bugs_fixed, s.progress), (0, 0, 0));
    }

    #[test]
    fn test_counter_changes_are_notified() {
        let mut d = dashboard();
        detect(&mut d);
        let effects = d.update(Message::Detector(DetectorMessage::Fix(4)));
        assert!(effects.contains(&SideEffect::Notify(LabEvent::CountersChanged {
            found: 4,
            fixed: 1,
            progress: 25,
        })));

        let effects = d.update(Message::Detector(DetectorMessage::Fix(4)));
        assert!(effects.is_empty());
    }

    #[test]
    fn test_duplicate_trigger_schedules_once() {
        let mut d = dashboard();
        let first = d.update(Message::Editor(EditorMessage::Run));
        let second = d.update(Message::Editor(EditorMessage::Run));
        assert_eq!(tickets(&first).len(), 1);
        assert!(second.is_empty());
    }

    #[test]
    fn test_stale_ticket_is_reported_as_discarded() {
        let mut d = dashboard();
        let ticket = tickets(&d.update(Message::Detector(DetectorMessage::Detect)))
            .pop()
            .unwrap();
        d.update(Message::Detector(DetectorMessage::Reset));
        let effects = d.update(Message::Settle(ticket));
        assert_eq!(
            effects,
            vec![SideEffect::Notify(LabEvent::RunDiscarded {
                panel: PanelId::Detector
            })]
        );
        assert_eq!(d.summary().bugs_found, 0);
    }

    #[test]
    fn test_console_follow_up_is_scheduled_on_settle() {
        let mut d = dashboard();
        let ticket = tickets(&d.update(Message::Console(ConsoleMessage::Preset(3))))
            .pop()
            .unwrap();
        let follow = tickets(&d.update(Message::Settle(ticket)));
        assert_eq!(follow.len(), 1);
        assert_eq!(follow[0].delay, d.timing.console_follow_up());
    }

    #[test]
    fn test_editor_effects() {
        let mut d = dashboard();
        d.update(Message::Editor(EditorMessage::SelectVariant("fixed".into())));
        let effects = d.update(Message::Editor(EditorMessage::Download));
        match &effects[..] {
            [SideEffect::Export { file_name, payload }] => {
                assert_eq!(file_name, "fixed-code.js");
                assert!(!payload.is_empty());
            }
            other => panic!("unexpected effects {other:?}"),
        }

        let effects = d.update(Message::Editor(EditorMessage::Copy));
        assert!(matches!(
            &effects[..],
            [SideEffect::CopyToClipboard { panel: PanelId::Editor, text }] if text.contains("Fixed code")
        ));
    }

    #[test]
    fn test_console_export_uses_configured_name() {
        let mut d = dashboard();
        let effects = d.update(Message::Console(ConsoleMessage::Export));
        assert!(matches!(
            &effects[..],
            [SideEffect::Export { file_name, .. }] if file_name == "debug-logs.txt"
        ));
    }

    #[test]
    fn test_copy_unknown_config_is_ignored() {
        let mut d = dashboard();
        assert!(d
            .update(Message::Tools(ToolsMessage::CopyConfig("webpack".into())))
            .is_empty());
        let effects = d.update(Message::Tools(ToolsMessage::CopyConfig("vscode".into())));
        assert_eq!(effects.len(), 1);
    }

    #[test]
    fn test_walkthrough_does_not_touch_counters() {
        let mut d = dashboard();
        let ticket = tickets(&d.update(Message::Walkthrough(WalkthroughMessage::Run)))
            .pop()
            .unwrap();
        d.update(Message::Settle(ticket));
        assert_eq!(d.walkthrough().completed_count(), 1);
        assert_eq!(d.summary().progress, 0);
    }

    #[test]
    fn test_select_tab() {
        let mut d = dashboard();
        assert_eq!(d.active_tab(), PanelId::Detector);
        d.update(Message::SelectTab(PanelId::Console));
        assert_eq!(d.active_tab(), PanelId::Console);
    }
}
