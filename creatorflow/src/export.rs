//! Rendering finished stage outputs for download or display.

use crate::core::{PipelineRun, Stage, StageStatus};
use serde::Serialize;
use std::fmt::Write;

/// Character limit used for card previews.
pub const PREVIEW_CHARS: usize = 300;

/// Truncates `text` to `max_chars` characters, appending `...` when cut.
#[must_use]
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Renders one completed stage as a Markdown section.
///
/// Returns `None` for stages that have not completed.
#[must_use]
pub fn stage_markdown(stage: &Stage) -> Option<String> {
    let output = stage.completed_output()?;
    Some(format!(
        "## {}\n\n_{}_\n\n{}\n",
        stage.name,
        stage.agent_label,
        output.trim_end()
    ))
}

/// Renders every completed stage of a run, in order.
#[must_use]
pub fn run_markdown(run: &PipelineRun) -> String {
    let mut doc = String::from("# Content Workflow\n");
    if let Some(run_id) = run.run_id {
        let _ = writeln!(doc, "\nRun: `{run_id}`");
    }
    for section in run.stages.iter().filter_map(stage_markdown) {
        doc.push('\n');
        doc.push_str(&section);
    }
    doc
}

#[derive(Serialize)]
struct ExportedStage<'a> {
    id: &'a str,
    name: &'a str,
    agent: &'a str,
    status: StageStatus,
    output: &'a str,
}

/// Serializes stages that have output as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn run_json(run: &PipelineRun) -> Result<String, serde_json::Error> {
    let stages: Vec<ExportedStage<'_>> = run
        .stages
        .iter()
        .filter_map(|stage| {
            Some(ExportedStage {
                id: stage.id.as_str(),
                name: &stage.name,
                agent: &stage.agent_label,
                status: stage.status,
                output: stage.output.as_deref()?,
            })
        })
        .collect();

    serde_json::to_string_pretty(&serde_json::json!({
        "run_id": run.run_id,
        "stages": stages,
    }))
}
