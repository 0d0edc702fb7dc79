use std::io::{self, Write};
use std::ops::ControlFlow;

use anyhow::Context;
use clap::Parser;
use dlab_cli::repl::{self, ReplCommand};
use dlab_cli::{render, CatalogFormat, Cli, Commands, DirExportSink, MemoryClipboard};
use dlab_core::logging::{init_logging, log_user_action};
use dlab_core::{
    Catalog, ConfigManager, ConsoleMessage, DetectorMessage, LabConfig, LabEvent, Message,
    PanelId, Session, WalkthroughMessage,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = ConfigManager::load_with(cli.config.as_deref())
        .context("loading configuration")?
        .into_config();
    if let Some(level) = cli.log_level {
        config.logging.level = level.to_string().to_lowercase();
    }
    if cli.instant {
        config.timing.instant = true;
    }
    if let Some(dir) = &cli.export_dir {
        config.export.dir = dir.clone();
    }
    init_logging(&config.logging)?;

    let catalog = match &cli.catalog {
        Some(path) => Catalog::load_from_path(path)
            .with_context(|| format!("loading catalog {}", path.display()))?,
        None => Catalog::builtin()?,
    };

    match cli.command.unwrap_or(Commands::Session) {
        Commands::Session => run_session(&catalog, &config).await,
        Commands::Detect { fixes } => run_detect(&catalog, &config, &fixes).await,
        Commands::Walkthrough => run_walkthrough(&catalog, &config).await,
        Commands::Console { commands, export } => {
            run_console(&catalog, &config, &commands, export).await
        }
        Commands::Catalog { format } => print_catalog(&catalog, format),
    }
}

fn new_session(catalog: &Catalog, config: &LabConfig) -> anyhow::Result<(Session, MemoryClipboard)> {
    let clipboard = MemoryClipboard::new();
    let session = Session::new(
        catalog,
        config,
        clipboard.clone(),
        DirExportSink::new(&config.export.dir),
    )?;
    info!(session = %session.id(), instant = config.timing.instant, "lab session ready");
    Ok((session, clipboard))
}

async fn run_detect(catalog: &Catalog, config: &LabConfig, fixes: &[u32]) -> anyhow::Result<()> {
    let (mut session, _) = new_session(catalog, config)?;
    let mut out = io::stdout().lock();

    session.dispatch(Message::Detector(DetectorMessage::Detect))?;
    session.run_until_idle().await?;
    render::detector(&mut out, session.dashboard())?;

    for &id in fixes {
        session.dispatch(Message::Detector(DetectorMessage::Fix(id)))?;
        write!(out, "fix {id}: ")?;
        render::summary(&mut out, session.dashboard())?;
    }
    render::summary(&mut out, session.dashboard())?;
    Ok(())
}

async fn run_walkthrough(catalog: &Catalog, config: &LabConfig) -> anyhow::Result<()> {
    let (mut session, _) = new_session(catalog, config)?;
    let mut out = io::stdout().lock();

    let steps = session.dashboard().walkthrough().steps().len();
    for index in 0..steps {
        session.dispatch(Message::Walkthrough(WalkthroughMessage::Jump(index)))?;
        session.dispatch(Message::Walkthrough(WalkthroughMessage::Run))?;
        session.run_until_idle().await?;
        render::walkthrough(&mut out, session.dashboard())?;
        writeln!(out)?;
    }
    Ok(())
}

async fn run_console(
    catalog: &Catalog,
    config: &LabConfig,
    commands: &[String],
    export: bool,
) -> anyhow::Result<()> {
    let (mut session, _) = new_session(catalog, config)?;

    for command in commands {
        session.dispatch(Message::Console(ConsoleMessage::Execute(command.clone())))?;
        session.run_until_idle().await?;
    }
    render::console(&mut io::stdout().lock(), session.dashboard())?;

    if export {
        session.dispatch(Message::Console(ConsoleMessage::Export))?;
        println!(
            "log exported to {}",
            config.export.dir.join(&config.export.console_file).display()
        );
    }
    Ok(())
}

fn print_catalog(catalog: &Catalog, format: CatalogFormat) -> anyhow::Result<()> {
    let mut out = io::stdout().lock();
    match format {
        CatalogFormat::Plain => render::catalog_table(&mut out, catalog)?,
        CatalogFormat::Json => {
            serde_json::to_writer_pretty(&mut out, catalog)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

async fn run_session(catalog: &Catalog, config: &LabConfig) -> anyhow::Result<()> {
    let (mut session, clipboard) = new_session(catalog, config)?;
    let mut events = session.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Debugging lab. Type `help` for commands.");
    render::summary(&mut io::stdout().lock(), session.dashboard())?;

    // Fired timers win over pending input.
    loop {
        tokio::select! {
            biased;
            settled = session.settle_next(), if session.pending_timers() > 0 => {
                settled?;
                report_events(&mut events, &session, &clipboard, config)?;
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if handle_line(&mut session, &mut events, &clipboard, config, &line)?.is_break() {
                    return Ok(());
                }
            }
        }
    }

    // Input closed: let runs in flight finish before exiting.
    session.run_until_idle().await?;
    report_events(&mut events, &session, &clipboard, config)?;
    render::summary(&mut io::stdout().lock(), session.dashboard())?;
    Ok(())
}

fn handle_line(
    session: &mut Session,
    events: &mut broadcast::Receiver<LabEvent>,
    clipboard: &MemoryClipboard,
    config: &LabConfig,
    line: &str,
) -> anyhow::Result<ControlFlow<()>> {
    let command = match repl::parse_line(line) {
        Ok(Some(command)) => command,
        Ok(None) => return Ok(ControlFlow::Continue(())),
        Err(message) => {
            println!("{message}");
            return Ok(ControlFlow::Continue(()));
        }
    };

    match command {
        ReplCommand::Quit => return Ok(ControlFlow::Break(())),
        ReplCommand::Help => println!("{}", repl::HELP),
        ReplCommand::Status => render::summary(&mut io::stdout().lock(), session.dashboard())?,
        ReplCommand::Show(panel) => {
            let panel = panel.unwrap_or(session.dashboard().active_tab());
            render::panel(&mut io::stdout().lock(), session.dashboard(), panel)?;
        }
        ReplCommand::Dispatch(msg) => {
            log_user_action("dispatch", &format!("{msg:?}"));
            let panel = target_panel(&msg);
            if let Err(err) = session.dispatch(msg) {
                println!("error: {err}");
            }
            report_events(events, session, clipboard, config)?;
            let mut out = io::stdout().lock();
            render::panel(&mut out, session.dashboard(), panel)?;
            render::summary(&mut out, session.dashboard())?;
        }
    }
    Ok(ControlFlow::Continue(()))
}

/// Print what the host did on the lab's behalf, and every panel whose run
/// just settled.
fn report_events(
    events: &mut broadcast::Receiver<LabEvent>,
    session: &Session,
    clipboard: &MemoryClipboard,
    config: &LabConfig,
) -> anyhow::Result<()> {
    let mut out = io::stdout().lock();
    loop {
        let event = match events.try_recv() {
            Ok(event) => event,
            Err(TryRecvError::Lagged(missed)) => {
                warn!(missed, "session events dropped");
                continue;
            }
            Err(_) => return Ok(()),
        };
        match event {
            LabEvent::Copied { .. } => {
                let bytes = clipboard.contents().map_or(0, |c| c.len());
                writeln!(out, "copied {bytes} bytes to clipboard")?;
            }
            LabEvent::Exported { file_name } => {
                writeln!(out, "saved {}", config.export.dir.join(file_name).display())?;
            }
            LabEvent::RunSettled { panel } => {
                render::panel(&mut out, session.dashboard(), panel)?;
                render::summary(&mut out, session.dashboard())?;
            }
            _ => {}
        }
    }
}

/// Panel a message acts on, shown after it is applied.
fn target_panel(msg: &Message) -> PanelId {
    match msg {
        Message::SelectTab(panel) => *panel,
        Message::Detector(_) => PanelId::Detector,
        Message::Editor(_) => PanelId::Editor,
        Message::Console(_) => PanelId::Console,
        Message::Tools(_) => PanelId::Tools,
        Message::Walkthrough(_) => PanelId::Walkthrough,
        Message::Settle(ticket) => ticket.panel,
    }
}
