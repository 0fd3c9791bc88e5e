//! Replay pointer script command.

use std::path::Path;

use dockyard_core::DragOutcome;
use dockyard_core::render::{RecordingSink, paint_indicators};
use dockyard_core::script::{Script, ScriptStep, StepRecord, replay};
use serde_json::{Value, json};
use tracing::info;

use crate::cli::OutputFormat;
use crate::commands::show::{tree_json, tree_lines};
use crate::error::CliError;
use crate::util::{HostOptions, load_host};

/// Simulate command handler
///
/// Every step is replayed even after a failure. The command fails with the
/// drop-failure exit code when any step hit a layout that changed under the
/// drag.
pub fn cmd_simulate(
    options: &HostOptions<'_>,
    layout: &Path,
    script: &Path,
    format: OutputFormat,
    paint: bool,
) -> Result<(), CliError> {
    let mut host = load_host(options, layout)?;
    let script = Script::load(script).map_err(|e| CliError::Script(e.to_string()))?;

    let records = replay(&mut host, &script);
    let failures = records.iter().filter(|r| r.is_consistency_failure()).count();
    info!(steps = records.len(), failures, "script replayed");

    let mut sink = RecordingSink::new();
    if paint {
        paint_indicators(&host, &mut sink);
    }

    match format {
        OutputFormat::Text => {
            for (i, record) in records.iter().enumerate() {
                println!("[{}] {}", i + 1, record_line(record));
            }
            println!();
            for line in tree_lines(host.tree()) {
                println!("{line}");
            }
            if paint {
                println!();
                for command in &sink.commands {
                    println!("{}", serde_json::to_string(command)?);
                }
            }
        }
        OutputFormat::Json => {
            let steps: Vec<Value> = records.iter().map(record_json).collect();
            let mut out = json!({ "steps": steps, "tree": tree_json(host.tree()) });
            if paint {
                out["paint"] = serde_json::to_value(&sink.commands)?;
            }
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }

    if failures > 0 {
        return Err(CliError::DropFailed(format!(
            "{failures} step(s) found the layout changed during the drag"
        )));
    }
    Ok(())
}

fn step_label(step: ScriptStep) -> String {
    match step {
        ScriptStep::Down(p) => format!("down {},{}", p.x, p.y),
        ScriptStep::Move(p) => format!("move {},{}", p.x, p.y),
        ScriptStep::Up(p) => format!("up {},{}", p.x, p.y),
        ScriptStep::CaptureLost => "capture_lost".to_string(),
        ScriptStep::CloseFloating => "close_floating".to_string(),
    }
}

fn outcome_label(outcome: &DragOutcome) -> String {
    match outcome {
        DragOutcome::Idle => "idle".to_string(),
        DragOutcome::Clicked(tab) => format!("clicked {tab}"),
        DragOutcome::Rearranged(tab) => format!("rearranged {tab}"),
        DragOutcome::Resized(split) => format!("resized {split}"),
        DragOutcome::Committed { tab, group, target } => {
            format!("committed {tab} to {group} ({target})")
        }
        DragOutcome::Cancelled { tab, group } => format!("cancelled {tab} back to {group}"),
    }
}

fn result_label(record: &StepRecord) -> Option<String> {
    match &record.result {
        Ok(None) => None,
        Ok(Some(outcome)) => Some(outcome_label(outcome)),
        Err(e) => Some(format!("error: {e}")),
    }
}

fn record_line(record: &StepRecord) -> String {
    let mut line = format!("{} -> {}", step_label(record.step), record.phase);
    if let Some(result) = result_label(record) {
        line.push_str(&format!(" [{result}]"));
    }
    if !record.events.is_empty() {
        line.push_str(&format!(" events: {}", record.events.join(", ")));
    }
    line
}

fn record_json(record: &StepRecord) -> Value {
    json!({
        "step": record.step,
        "phase": record.phase.to_string(),
        "result": result_label(record),
        "failed": record.result.is_err(),
        "events": record.events,
    })
}
