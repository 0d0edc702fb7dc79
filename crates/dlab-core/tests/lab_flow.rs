//! End-to-end flows through the session driver with a paused clock.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use dlab_core::panels::{LogKind, Verdict};
use dlab_core::{
    Catalog, Clipboard, ConsoleMessage, DetectorMessage, ExportSink, LabConfig, LabEvent, Message,
    PanelId, Result, Session, ToolsMessage, WalkthroughMessage,
};

#[derive(Clone, Default)]
struct MemoryClipboard(Arc<Mutex<Vec<String>>>);

impl Clipboard for MemoryClipboard {
    fn copy(&mut self, text: &str) -> Result<()> {
        self.0.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

#[derive(Clone, Default)]
struct MemorySink(Arc<Mutex<Vec<(String, Vec<u8>)>>>);

impl ExportSink for MemorySink {
    fn save(&mut self, file_name: &str, payload: &[u8]) -> Result<()> {
        self.0
            .lock()
            .unwrap()
            .push((file_name.to_string(), payload.to_vec()));
        Ok(())
    }
}

fn session_with(clipboard: MemoryClipboard, sink: MemorySink) -> Session {
    Session::new(
        &Catalog::builtin().unwrap(),
        &LabConfig::default(),
        clipboard,
        sink,
    )
    .unwrap()
}

fn session() -> Session {
    session_with(MemoryClipboard::default(), MemorySink::default())
}

fn detector(msg: DetectorMessage) -> Message {
    Message::Detector(msg)
}

#[tokio::test(start_paused = true)]
async fn detect_fix_and_reset() {
    let mut s = session();
    assert_eq!(s.dashboard().summary().bugs_found, 0);

    s.dispatch(detector(DetectorMessage::Detect)).unwrap();
    s.run_until_idle().await.unwrap();
    assert_eq!(s.dashboard().summary().bugs_found, 4);

    s.dispatch(detector(DetectorMessage::Fix(1))).unwrap();
    assert_eq!(s.dashboard().summary().progress, 25);
    s.dispatch(detector(DetectorMessage::Fix(2))).unwrap();
    assert_eq!(s.dashboard().summary().progress, 50);

    s.dispatch(detector(DetectorMessage::Reset)).unwrap();
    let summary = s.dashboard().summary();
    assert_eq!(summary.bugs_found, 0);
    assert_eq!(summary.bugs_fixed, 0);
    assert_eq!(summary.progress, 0);
}

#[tokio::test(start_paused = true)]
async fn detection_settling_after_reset_is_dropped() {
    let mut s = session();
    let mut events = s.subscribe();

    s.dispatch(detector(DetectorMessage::Detect)).unwrap();
    tokio::time::sleep(Duration::from_millis(500)).await;
    s.dispatch(detector(DetectorMessage::Reset)).unwrap();
    s.run_until_idle().await.unwrap();

    assert_eq!(s.dashboard().summary().bugs_found, 0);
    assert!(s.dashboard().detector().bugs().is_empty());

    let mut discarded = false;
    while let Ok(event) = events.try_recv() {
        if event
            == (LabEvent::RunDiscarded {
                panel: PanelId::Detector,
            })
        {
            discarded = true;
        }
    }
    assert!(discarded);
}

#[tokio::test(start_paused = true)]
async fn new_detection_after_reset_is_not_settled_by_old_timer() {
    let mut s = session();
    s.dispatch(detector(DetectorMessage::Detect)).unwrap();
    tokio::time::sleep(Duration::from_millis(1500)).await;

    s.dispatch(detector(DetectorMessage::Reset)).unwrap();
    s.dispatch(detector(DetectorMessage::LoadSample)).unwrap();
    s.dispatch(detector(DetectorMessage::Detect)).unwrap();

    // The first timer fires 500ms from here and must not settle the new run.
    assert!(s.settle_next().await.unwrap());
    assert!(s.dashboard().detector().is_analyzing());
    assert_eq!(s.dashboard().summary().bugs_found, 0);

    assert!(s.settle_next().await.unwrap());
    assert_eq!(s.dashboard().summary().bugs_found, 4);
}

#[tokio::test(start_paused = true)]
async fn console_help_and_clear() {
    let mut s = session();
    s.dispatch(Message::Console(ConsoleMessage::Execute("clear".into())))
        .unwrap();
    assert!(s.dashboard().console().log().is_empty());
    assert_eq!(s.pending_timers(), 0);

    s.dispatch(Message::Console(ConsoleMessage::Execute("HELP".into())))
        .unwrap();
    assert_eq!(s.dashboard().console().log().len(), 1);
    s.run_until_idle().await.unwrap();

    let log = s.dashboard().console().log();
    assert_eq!(log.len(), 9);
    assert_eq!(log[0].message, "> HELP");
    assert_eq!(log[1].kind, LogKind::Info);
}

#[tokio::test(start_paused = true)]
async fn clearing_during_npm_test_drops_the_summary() {
    let mut s = session();
    s.dispatch(Message::Console(ConsoleMessage::Execute("npm test".into())))
        .unwrap();
    // Primary batch.
    assert!(s.settle_next().await.unwrap());
    assert_eq!(s.pending_timers(), 1);

    s.dispatch(Message::Console(ConsoleMessage::Execute("clear".into())))
        .unwrap();
    s.run_until_idle().await.unwrap();
    assert!(s.dashboard().console().log().is_empty());
}

#[tokio::test(start_paused = true)]
async fn console_export_reaches_sink() {
    let sink = MemorySink::default();
    let files = sink.0.clone();
    let mut s = session_with(MemoryClipboard::default(), sink);

    s.dispatch(Message::Console(ConsoleMessage::Export)).unwrap();

    let files = files.lock().unwrap();
    let (name, payload) = &files[0];
    assert_eq!(name, "debug-logs.txt");
    let text = String::from_utf8(payload.clone()).unwrap();
    assert_eq!(text.lines().count(), 2);
    assert!(text.contains("INFO: Node.js debug console started"));
}

#[tokio::test(start_paused = true)]
async fn copy_config_reaches_clipboard() {
    let clipboard = MemoryClipboard::default();
    let copied = clipboard.0.clone();
    let mut s = session_with(clipboard, MemorySink::default());

    s.dispatch(Message::Tools(ToolsMessage::CopyConfig("vscode".into())))
        .unwrap();
    assert!(copied.lock().unwrap()[0].contains("\"type\": \"node\""));
}

#[tokio::test(start_paused = true)]
async fn walkthrough_to_completion() {
    let mut s = session();
    let steps = s.dashboard().walkthrough().steps().len();

    for index in 0..steps {
        s.dispatch(Message::Walkthrough(WalkthroughMessage::Jump(index)))
            .unwrap();
        s.dispatch(Message::Walkthrough(WalkthroughMessage::Run))
            .unwrap();
        s.run_until_idle().await.unwrap();
        let expected = if index % 2 == 0 {
            Verdict::BugDetected
        } else {
            Verdict::BugFixed
        };
        assert_eq!(s.dashboard().walkthrough().verdict(), Some(expected));
    }
    assert_eq!(s.dashboard().walkthrough().progress(), 100.0);

    s.dispatch(Message::Walkthrough(WalkthroughMessage::Next))
        .unwrap();
    // Already on the last step: output stays.
    assert!(s.dashboard().walkthrough().output().is_some());

    s.dispatch(Message::Walkthrough(WalkthroughMessage::Reset))
        .unwrap();
    assert_eq!(s.dashboard().walkthrough().current_index(), 0);
    assert_eq!(s.dashboard().walkthrough().progress(), 0.0);
}
