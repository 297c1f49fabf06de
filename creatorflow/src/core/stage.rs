//! Stage state and the in-memory pipeline run.

use super::{StageId, StageStatus};
use crate::errors::PipelineError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// One unit of work in the content-generation sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    /// The stage identifier.
    pub id: StageId,
    /// Human-readable stage name (e.g. "Content Planning").
    pub name: String,
    /// The agent credited with the stage (e.g. "Planning Agent").
    pub agent_label: String,
    /// Current status.
    pub status: StageStatus,
    /// Cosmetic progress, 0 to 100.
    pub progress: u8,
    /// Generated text on success, error text on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl Stage {
    /// Creates a pending stage.
    #[must_use]
    pub fn new(id: StageId, name: impl Into<String>, agent_label: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            agent_label: agent_label.into(),
            status: StageStatus::Pending,
            progress: 0,
            output: None,
        }
    }

    /// Creates a pending stage using the built-in name and agent label.
    #[must_use]
    pub fn for_id(id: StageId) -> Self {
        let def = crate::prompts::definition(id);
        Self::new(id, def.name, def.agent_label)
    }

    /// Marks the stage as running with zero progress.
    pub fn start(&mut self) {
        self.status = StageStatus::Running;
        self.progress = 0;
    }

    /// Marks the stage as completed with the given output.
    pub fn complete(&mut self, output: impl Into<String>) {
        self.status = StageStatus::Completed;
        self.progress = 100;
        self.output = Some(output.into());
    }

    /// Marks the stage as failed, storing a readable error message as output.
    pub fn fail(&mut self, message: impl AsRef<str>) {
        self.status = StageStatus::Failed;
        self.progress = 0;
        self.output = Some(format!("Error: {}", message.as_ref()));
    }

    /// Advances cosmetic progress by `step`, never beyond `cap`.
    ///
    /// Only a running stage moves. Returns the new value when it changed.
    pub fn advance_progress(&mut self, step: u8, cap: u8) -> Option<u8> {
        if self.status != StageStatus::Running || self.progress >= cap {
            return None;
        }
        self.progress = self.progress.saturating_add(step).min(cap);
        Some(self.progress)
    }

    /// Returns the stage to its pristine pending state.
    pub fn reset(&mut self) {
        self.status = StageStatus::Pending;
        self.progress = 0;
        self.output = None;
    }

    /// Returns the output if the stage completed.
    #[must_use]
    pub fn completed_output(&self) -> Option<&str> {
        if self.status == StageStatus::Completed {
            self.output.as_deref()
        } else {
            None
        }
    }
}

/// The in-memory state of one execution of the stage sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineRun {
    /// Identifier of the current run, assigned when a run starts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<Uuid>,
    /// Stages in execution order.
    pub stages: Vec<Stage>,
    /// Index of the stage currently (or most recently) executing.
    pub cursor: usize,
    /// Whether a run is in flight.
    pub running: bool,
}

impl PipelineRun {
    /// Creates a run over the given stage identifiers.
    pub fn from_ids(ids: &[StageId]) -> Result<Self, PipelineError> {
        if ids.is_empty() {
            return Err(PipelineError::Empty);
        }
        let mut seen = HashSet::new();
        for id in ids {
            if !seen.insert(*id) {
                return Err(PipelineError::DuplicateStage(*id));
            }
        }

        Ok(Self {
            run_id: None,
            stages: ids.iter().copied().map(Stage::for_id).collect(),
            cursor: 0,
            running: false,
        })
    }

    /// Creates a run over all six stages.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            run_id: None,
            stages: StageId::ALL.into_iter().map(Stage::for_id).collect(),
            cursor: 0,
            running: false,
        }
    }

    /// Returns the number of stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns true if the run has no stages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Returns a stage by identifier.
    #[must_use]
    pub fn stage(&self, id: StageId) -> Option<&Stage> {
        self.stages.iter().find(|s| s.id == id)
    }

    /// Returns a mutable stage by identifier.
    pub fn stage_mut(&mut self, id: StageId) -> Option<&mut Stage> {
        self.stages.iter_mut().find(|s| s.id == id)
    }

    /// Returns the number of completed stages.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.count(StageStatus::Completed)
    }

    /// Returns the number of failed stages.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.count(StageStatus::Failed)
    }

    /// Returns the number of running stages. Never more than one.
    #[must_use]
    pub fn running_count(&self) -> usize {
        self.count(StageStatus::Running)
    }

    fn count(&self, status: StageStatus) -> usize {
        self.stages.iter().filter(|s| s.status == status).count()
    }

    /// Percentage of stages that completed.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn overall_progress(&self) -> f64 {
        if self.stages.is_empty() {
            return 0.0;
        }
        self.completed_count() as f64 / self.stages.len() as f64 * 100.0
    }

    /// True only when every stage completed. A failed stage blocks this
    /// until the run is reset.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.stages.is_empty() && self.stages.iter().all(|s| s.status == StageStatus::Completed)
    }

    /// Returns every stage to pending and clears run-level state.
    pub fn reset(&mut self) {
        for stage in &mut self.stages {
            stage.reset();
        }
        self.run_id = None;
        self.cursor = 0;
        self.running = false;
    }
}

impl Default for PipelineRun {
    fn default() -> Self {
        Self::standard()
    }
}
