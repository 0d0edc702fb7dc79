//! Line grammar of the interactive session.
//!
//! Every line names a panel and an action, e.g. `detector fix 2`,
//! `console exec npm test` or `demo next`. A few lines stand alone:
//! `status`, `show`, `help`, `quit`.

use dlab_core::panels::{DetailTab, PanelId};
use dlab_core::{
    ConsoleMessage, DetectorMessage, EditorMessage, Message, ToolsMessage, WalkthroughMessage,
};

pub const HELP: &str = "\
status                       header statistics
show [panel]                 print a panel (default: active tab)
tab <panel>                  switch tab (detector, editor, console, tools, demo)
detector sample|detect|reset
detector code <text>         replace the code under analysis
detector select|fix <id>
editor variant <id>          buggy or fixed
editor run|copy|download
console exec <command>       also: `$ <command>`
console preset <n>|clear|export
tools select <id>
tools tab overview|usage|config
tools copy <config>
demo next|prev|run|reset
demo jump <n>                1-based step number
quit";

#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Dispatch(Message),
    Show(Option<PanelId>),
    Status,
    Help,
    Quit,
}

/// Parse one input line. Blank lines parse to `None`.
pub fn parse_line(line: &str) -> Result<Option<ReplCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    if let Some(command) = line.strip_prefix('$') {
        return Ok(Some(console(ConsoleMessage::Execute(command.trim().to_string()))));
    }

    let (head, rest) = split_word(line);
    let command = match head.to_ascii_lowercase().as_str() {
        "quit" | "exit" => ReplCommand::Quit,
        "help" | "?" => ReplCommand::Help,
        "status" => ReplCommand::Status,
        "show" if rest.is_empty() => ReplCommand::Show(None),
        "show" => ReplCommand::Show(Some(rest.parse()?)),
        "tab" => ReplCommand::Dispatch(Message::SelectTab(rest.parse()?)),
        "detector" => parse_detector(rest)?,
        "editor" => parse_editor(rest)?,
        "console" => parse_console(rest)?,
        "tools" => parse_tools(rest)?,
        "demo" | "walkthrough" => parse_walkthrough(rest)?,
        other => return Err(format!("unknown command '{other}', try `help`")),
    };
    Ok(Some(command))
}

fn split_word(text: &str) -> (&str, &str) {
    match text.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (text, ""),
    }
}

fn number<T: std::str::FromStr>(text: &str) -> Result<T, String> {
    text.parse()
        .map_err(|_| format!("expected a number, got '{text}'"))
}

fn detector(msg: DetectorMessage) -> ReplCommand {
    ReplCommand::Dispatch(Message::Detector(msg))
}

fn console(msg: ConsoleMessage) -> ReplCommand {
    ReplCommand::Dispatch(Message::Console(msg))
}

fn parse_detector(args: &str) -> Result<ReplCommand, String> {
    let (action, rest) = split_word(args);
    let msg = match action {
        "sample" => DetectorMessage::LoadSample,
        "code" => DetectorMessage::SetCode(rest.to_string()),
        "detect" => DetectorMessage::Detect,
        "select" => DetectorMessage::Select(number(rest)?),
        "fix" => DetectorMessage::Fix(number(rest)?),
        "reset" => DetectorMessage::Reset,
        other => return Err(format!("unknown detector action '{other}'")),
    };
    Ok(detector(msg))
}

fn parse_editor(args: &str) -> Result<ReplCommand, String> {
    let (action, rest) = split_word(args);
    let msg = match action {
        "variant" => EditorMessage::SelectVariant(rest.to_string()),
        "run" => EditorMessage::Run,
        "copy" => EditorMessage::Copy,
        "download" => EditorMessage::Download,
        other => return Err(format!("unknown editor action '{other}'")),
    };
    Ok(ReplCommand::Dispatch(Message::Editor(msg)))
}

fn parse_console(args: &str) -> Result<ReplCommand, String> {
    let (action, rest) = split_word(args);
    let msg = match action {
        "exec" => ConsoleMessage::Execute(rest.to_string()),
        "preset" => {
            let n: usize = number(rest)?;
            ConsoleMessage::Preset(n.saturating_sub(1))
        }
        "clear" => ConsoleMessage::ClearLog,
        "export" => ConsoleMessage::Export,
        other => return Err(format!("unknown console action '{other}'")),
    };
    Ok(console(msg))
}

fn parse_tools(args: &str) -> Result<ReplCommand, String> {
    let (action, rest) = split_word(args);
    let msg = match action {
        "select" => ToolsMessage::Select(rest.to_string()),
        "tab" => ToolsMessage::SelectTab(match rest {
            "overview" => DetailTab::Overview,
            "usage" => DetailTab::Usage,
            "config" => DetailTab::Config,
            other => return Err(format!("unknown tab '{other}'")),
        }),
        "copy" => ToolsMessage::CopyConfig(rest.to_string()),
        other => return Err(format!("unknown tools action '{other}'")),
    };
    Ok(ReplCommand::Dispatch(Message::Tools(msg)))
}

fn parse_walkthrough(args: &str) -> Result<ReplCommand, String> {
    let (action, rest) = split_word(args);
    let msg = match action {
        "next" => WalkthroughMessage::Next,
        "prev" => WalkthroughMessage::Prev,
        "run" => WalkthroughMessage::Run,
        "reset" => WalkthroughMessage::Reset,
        "jump" => {
            let n: usize = number(rest)?;
            // `jump 0` stays out of range rather than aliasing step 1.
            WalkthroughMessage::Jump(n.checked_sub(1).unwrap_or(usize::MAX))
        }
        other => return Err(format!("unknown demo action '{other}'")),
    };
    Ok(ReplCommand::Dispatch(Message::Walkthrough(msg)))
}
