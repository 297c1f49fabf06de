//! Test assertions for stage state.

use crate::core::{PipelineRun, Stage, StageStatus};

/// Asserts that the stage completed with a non-empty output.
pub fn assert_stage_completed(stage: &Stage) {
    assert_eq!(
        stage.status,
        StageStatus::Completed,
        "Expected {} to be completed, got {:?} (output: {:?})",
        stage.id,
        stage.status,
        stage.output
    );
    assert_eq!(stage.progress, 100, "Completed stage {} must report 100", stage.id);
    assert!(
        stage.output.as_deref().is_some_and(|o| !o.is_empty()),
        "Completed stage {} has no output",
        stage.id
    );
}

/// Asserts that the stage failed and its output carries an error message.
pub fn assert_stage_failed(stage: &Stage) {
    assert_eq!(
        stage.status,
        StageStatus::Failed,
        "Expected {} to be failed, got {:?}",
        stage.id,
        stage.status
    );
    assert!(
        stage.output.as_deref().is_some_and(|o| o.starts_with("Error: ")),
        "Failed stage {} should carry an error message, got {:?}",
        stage.id,
        stage.output
    );
}

/// Asserts that the stage output contains `needle`.
pub fn assert_output_contains(stage: &Stage, needle: &str) {
    let output = stage.output.as_deref().unwrap_or_default();
    assert!(
        output.contains(needle),
        "Expected output of {} to contain {:?}, got {:?}",
        stage.id,
        needle,
        output
    );
}

/// Asserts that every stage of the run is pending with no output.
pub fn assert_all_pending(run: &PipelineRun) {
    for stage in &run.stages {
        assert_eq!(
            stage.status,
            StageStatus::Pending,
            "Expected {} to be pending, got {:?}",
            stage.id,
            stage.status
        );
        assert_eq!(stage.progress, 0, "Pending stage {} has progress", stage.id);
        assert!(stage.output.is_none(), "Pending stage {} has output", stage.id);
    }
}
