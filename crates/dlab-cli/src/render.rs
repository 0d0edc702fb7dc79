//! Plain-text rendering of dashboard state.

use std::io::{self, Write};

use dlab_core::panels::{DetailTab, PanelId};
use dlab_core::{Catalog, Dashboard, RunState};
use tabwriter::TabWriter;

pub fn summary<W: Write>(out: &mut W, dashboard: &Dashboard) -> io::Result<()> {
    let s = dashboard.summary();
    writeln!(
        out,
        "bugs found {} | fixed {} | tools {} | progress {}%",
        s.bugs_found, s.bugs_fixed, s.tools, s.progress
    )
}

pub fn panel<W: Write>(out: &mut W, dashboard: &Dashboard, panel: PanelId) -> io::Result<()> {
    writeln!(out, "== {} ==", panel.title())?;
    match panel {
        PanelId::Detector => detector(out, dashboard),
        PanelId::Editor => editor(out, dashboard),
        PanelId::Console => console(out, dashboard),
        PanelId::Tools => tools(out, dashboard),
        PanelId::Walkthrough => walkthrough(out, dashboard),
    }
}

fn state_label(state: RunState) -> &'static str {
    match state {
        RunState::Idle => "idle",
        RunState::Running => "running...",
        RunState::Settled => "done",
    }
}

pub fn detector<W: Write>(out: &mut W, dashboard: &Dashboard) -> io::Result<()> {
    let detector = dashboard.detector();
    writeln!(out, "analysis: {}", state_label(detector.run_state()))?;
    if detector.bugs().is_empty() {
        writeln!(out, "no bugs detected yet")?;
        return Ok(());
    }

    let mut tw = TabWriter::new(&mut *out);
    writeln!(tw, "ID\tTYPE\tLINE\tSEVERITY\tSTATUS")?;
    for bug in detector.bugs().iter() {
        let status = if detector.is_fixed(bug.id) { "fixed" } else { "open" };
        writeln!(
            tw,
            "{}\t{}\t{}\t{}\t{}",
            bug.id, bug.kind, bug.line, bug.severity, status
        )?;
    }
    tw.flush()?;
    drop(tw);

    if let Some(bug) = detector.selected() {
        writeln!(out, "#{} {}", bug.id, bug.description)?;
        for hint in &bug.hints {
            writeln!(out, "  - {hint}")?;
        }
    }
    Ok(())
}

pub fn editor<W: Write>(out: &mut W, dashboard: &Dashboard) -> io::Result<()> {
    let editor = dashboard.editor();
    if let Some(variant) = editor.current() {
        writeln!(out, "variant: {} ({})", variant.label, variant.id)?;
    }
    writeln!(out, "run: {}", state_label(editor.run_state()))?;
    if let Some(output) = editor.output() {
        writeln!(out, "{}", output.trim_end())?;
    }
    Ok(())
}

pub fn console<W: Write>(out: &mut W, dashboard: &Dashboard) -> io::Result<()> {
    for entry in dashboard.console().log() {
        writeln!(out, "{}", entry.render())?;
    }
    Ok(())
}

pub fn tools<W: Write>(out: &mut W, dashboard: &Dashboard) -> io::Result<()> {
    let tools = dashboard.tools();
    let mut tw = TabWriter::new(&mut *out);
    writeln!(tw, "ID\tNAME\tCATEGORY")?;
    for tool in tools.tools().iter() {
        writeln!(tw, "{}\t{}\t{}", tool.id, tool.name, tool.category)?;
    }
    tw.flush()?;
    drop(tw);

    let Some(tool) = tools.selected() else {
        return Ok(());
    };
    writeln!(out, "-- {} [{:?}] --", tool.name, tools.tab())?;
    match tools.tab() {
        DetailTab::Overview => {
            writeln!(out, "{}", tool.description)?;
            for method in &tool.methods {
                writeln!(out, "  {} - {}", method.name, method.description)?;
            }
            for command in &tool.commands {
                writeln!(out, "  {} - {}", command.command, command.description)?;
            }
            for feature in &tool.features {
                writeln!(out, "  * {feature}")?;
            }
        }
        DetailTab::Usage => {
            for (i, step) in tool.usage.iter().enumerate() {
                writeln!(out, "  {}. {}", i + 1, step)?;
            }
        }
        DetailTab::Config => {
            for snippet in tools.selected_configurations() {
                writeln!(out, "{} ({}):", snippet.title, snippet.name)?;
                writeln!(out, "{}", snippet.body.trim_end())?;
            }
        }
    }
    Ok(())
}

pub fn walkthrough<W: Write>(out: &mut W, dashboard: &Dashboard) -> io::Result<()> {
    let demo = dashboard.walkthrough();
    let nav = demo.navigator();
    if let Some(step) = demo.current_step() {
        writeln!(
            out,
            "step {}/{}: {} [{}]",
            nav.current() + 1,
            nav.step_count(),
            step.title,
            step.bug_type
        )?;
        writeln!(out, "{}", step.description)?;
    }
    if let Some(output) = demo.output() {
        writeln!(out, "{output}")?;
    }
    if let Some(verdict) = demo.verdict() {
        writeln!(out, "verdict: {verdict}")?;
    }
    writeln!(
        out,
        "completed {}/{} ({:.0}%)",
        demo.completed_count(),
        nav.step_count(),
        demo.progress()
    )
}

pub fn catalog_table<W: Write>(out: &mut W, catalog: &Catalog) -> io::Result<()> {
    let mut tw = TabWriter::new(&mut *out);
    writeln!(tw, "STORE\tID\tTITLE")?;
    for bug in &catalog.detector.bugs {
        writeln!(tw, "bug\t{}\t{} (line {}, {})", bug.id, bug.kind, bug.line, bug.severity)?;
    }
    for variant in &catalog.editor.variants {
        writeln!(tw, "variant\t{}\t{}", variant.id, variant.label)?;
    }
    for command in &catalog.console.commands {
        writeln!(tw, "command\t{}\t{} line(s)", command.command, command.output.len())?;
    }
    for tool in &catalog.tools.tools {
        writeln!(tw, "tool\t{}\t{}", tool.id, tool.name)?;
    }
    for step in &catalog.walkthrough.steps {
        writeln!(tw, "step\t{}\t{}", step.id, step.title)?;
    }
    tw.flush()
}
