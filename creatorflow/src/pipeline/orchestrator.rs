//! Sequential orchestration of the content pipeline.

use super::runner::{StageInput, StageRunner};
use super::SharedRun;
use crate::cancellation::CancellationToken;
use crate::config::{PipelineConfig, UpstreamFailurePolicy};
use crate::context::{CampaignProfile, IdentityProvider};
use crate::core::{
    ActivityLogEntry, ContentRecord, PipelineEvent, PipelineRun, Stage, StageId, StageStatus,
};
use crate::errors::PipelineError;
use crate::events::{EventSink, LoggingEventSink};
use crate::generation::GenerationClient;
use crate::persistence::PersistenceSink;
use crate::utils::{generate_run_id, unix_millis};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

/// Outcome of one call to [`ContentPipeline::run_all`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// The run identifier.
    pub run_id: Uuid,
    /// Stages that completed.
    pub completed: usize,
    /// Stages that failed.
    pub failed: usize,
    /// Whether the run stopped early on cancellation.
    pub cancelled: bool,
    /// Whether every stage completed.
    pub all_completed: bool,
    /// Total wall time in milliseconds.
    pub duration_ms: f64,
}

const RUN_ABORTED: &str = "run aborted";

/// Clears the running flag when a run ends, including when its future is dropped.
///
/// A dropped run fails the stage it left Running, so the run never reports
/// two stages in flight, and emits `pipeline.cancelled` so event consumers
/// see it end.
struct RunningFlag<'a> {
    state: &'a SharedRun,
    events: &'a Arc<dyn EventSink>,
    run_id: Uuid,
    finished: bool,
}

impl Drop for RunningFlag<'_> {
    fn drop(&mut self) {
        let mut run = self.state.write();
        if !self.finished {
            for stage in &mut run.stages {
                if stage.status == StageStatus::Running {
                    stage.fail(RUN_ABORTED);
                    self.events
                        .publish(&PipelineEvent::stage_failed(stage.id, RUN_ABORTED));
                }
            }
            warn!(run_id = %self.run_id, "Pipeline run dropped before finishing");
            self.events.publish(&PipelineEvent::pipeline_cancelled(
                &self.run_id.to_string(),
                RUN_ABORTED,
            ));
        }
        run.running = false;
    }
}

/// Builder for [`ContentPipeline`].
pub struct ContentPipelineBuilder {
    client: Arc<dyn GenerationClient>,
    sink: Arc<dyn PersistenceSink>,
    identity: Arc<dyn IdentityProvider>,
    events: Option<Arc<dyn EventSink>>,
    config: PipelineConfig,
    campaign: Option<CampaignProfile>,
    stages: Option<Vec<StageId>>,
}

impl std::fmt::Debug for ContentPipelineBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentPipelineBuilder")
            .field("config", &self.config)
            .field("campaign", &self.campaign)
            .field("stages", &self.stages)
            .finish_non_exhaustive()
    }
}

impl ContentPipelineBuilder {
    /// Sets the event sink. Defaults to a [`LoggingEventSink`].
    #[must_use]
    pub fn events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = Some(events);
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Attaches a campaign whose context is embedded in every prompt.
    #[must_use]
    pub fn campaign(mut self, campaign: CampaignProfile) -> Self {
        self.campaign = Some(campaign);
        self
    }

    /// Restricts the pipeline to the given stages, in order.
    #[must_use]
    pub fn stages(mut self, stages: &[StageId]) -> Self {
        self.stages = Some(stages.to_vec());
        self
    }

    /// Builds the pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error if the stage list is empty or repeats a stage, or
    /// if the configuration is invalid.
    pub fn build(self) -> Result<ContentPipeline, crate::errors::CreatorflowError> {
        self.config.validate()?;
        let run = match &self.stages {
            Some(ids) => PipelineRun::from_ids(ids)?,
            None => PipelineRun::standard(),
        };

        let campaign_ref = self
            .campaign
            .as_ref()
            .and_then(|c| c.id.clone())
            .unwrap_or_else(|| format!("demo_{}", unix_millis()));
        let campaign_context = self.campaign.as_ref().map(CampaignProfile::render_context);
        let events = self
            .events
            .unwrap_or_else(|| Arc::new(LoggingEventSink::default()));

        Ok(ContentPipeline {
            state: Arc::new(RwLock::new(run)),
            runner: StageRunner::new(
                self.client,
                self.sink.clone(),
                self.identity.clone(),
                events.clone(),
                self.config,
            ),
            sink: self.sink,
            identity: self.identity,
            events,
            campaign: self.campaign,
            campaign_ref,
            campaign_context,
            cancel: CancellationToken::new(),
        })
    }
}

/// Runs the content stages in order, feeding each stage the previous output.
///
/// All run state lives in memory behind a lock; the persistence sink only
/// receives finished stage outputs and explicit saves.
pub struct ContentPipeline {
    state: SharedRun,
    runner: StageRunner,
    sink: Arc<dyn PersistenceSink>,
    identity: Arc<dyn IdentityProvider>,
    events: Arc<dyn EventSink>,
    campaign: Option<CampaignProfile>,
    campaign_ref: String,
    campaign_context: Option<String>,
    cancel: CancellationToken,
}

impl std::fmt::Debug for ContentPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentPipeline")
            .field("state", &*self.state.read())
            .field("campaign_ref", &self.campaign_ref)
            .field("cancel", &self.cancel)
            .finish_non_exhaustive()
    }
}

impl ContentPipeline {
    /// Starts building a pipeline over the three collaborators.
    #[must_use]
    pub fn builder(
        client: Arc<dyn GenerationClient>,
        sink: Arc<dyn PersistenceSink>,
        identity: Arc<dyn IdentityProvider>,
    ) -> ContentPipelineBuilder {
        ContentPipelineBuilder {
            client,
            sink,
            identity,
            events: None,
            config: PipelineConfig::default(),
            campaign: None,
            stages: None,
        }
    }

    /// Executes every stage in order and returns a summary.
    ///
    /// Each run starts from pending stages. A failed stage does not stop the
    /// run; what its successor sees is governed by the configured
    /// [`UpstreamFailurePolicy`].
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::AlreadyRunning`] if a run is in flight.
    pub async fn run_all(&self) -> Result<RunSummary, PipelineError> {
        let (run_id, stage_count) = {
            let mut run = self.state.write();
            if run.running {
                return Err(PipelineError::AlreadyRunning);
            }
            run.reset();
            run.running = true;
            self.cancel.reset();
            let run_id = generate_run_id();
            run.run_id = Some(run_id);
            (run_id, run.len())
        };
        let mut flag = RunningFlag {
            state: &self.state,
            events: &self.events,
            run_id,
            finished: false,
        };

        let span = info_span!("pipeline_run", run_id = %run_id, stages = stage_count);
        let summary = self
            .execute(run_id, stage_count)
            .instrument(span)
            .await;
        flag.finished = true;
        Ok(summary)
    }

    async fn execute(&self, run_id: Uuid, stage_count: usize) -> RunSummary {
        let started = Instant::now();
        let run_label = run_id.to_string();
        self.events
            .publish(&PipelineEvent::pipeline_started(&run_label, stage_count));
        info!("Pipeline run started");

        let delay = self.runner.config().inter_stage_delay();
        let mut cancelled = false;
        for index in 0..stage_count {
            if self.cancel.is_cancelled() {
                cancelled = true;
                break;
            }
            self.state.write().cursor = index;

            let input = self.stage_input(index);
            let stage = self
                .runner
                .run_stage(&self.state, index, &input, &self.cancel)
                .await;

            // A cancel that lands after the last stage finished interrupts nothing.
            if self.cancel.is_cancelled() {
                cancelled = index + 1 < stage_count || stage.status == StageStatus::Failed;
                break;
            }

            if !delay.is_zero() {
                tokio::select! {
                    () = tokio::time::sleep(delay) => {}
                    () = self.cancel.cancelled() => {}
                }
            }
        }

        let (completed, failed) = {
            let run = self.state.read();
            (run.completed_count(), run.failed_count())
        };
        if cancelled {
            let reason = self.cancel.reason().unwrap_or_default();
            warn!(reason = %reason, completed, failed, "Pipeline run cancelled");
            self.events
                .publish(&PipelineEvent::pipeline_cancelled(&run_label, &reason));
        } else {
            info!(completed, failed, "Pipeline run finished");
            self.events.publish(&PipelineEvent::pipeline_completed(
                &run_label, completed, failed,
            ));
        }

        RunSummary {
            run_id,
            completed,
            failed,
            cancelled,
            all_completed: completed == stage_count,
            duration_ms: started.elapsed().as_secs_f64() * 1000.0,
        }
    }

    fn stage_input(&self, index: usize) -> StageInput<'_> {
        let mut input = StageInput {
            prior_output: String::new(),
            campaign_context: self.campaign_context.as_deref(),
            campaign_ref: &self.campaign_ref,
            upstream_failed: None,
        };

        let run = self.state.read();
        let Some(previous) = index.checked_sub(1).and_then(|i| run.stages.get(i)) else {
            return input;
        };

        match previous.status {
            StageStatus::Completed => {
                input.prior_output = previous.output.clone().unwrap_or_default();
            }
            StageStatus::Failed => match self.runner.config().upstream_failure {
                UpstreamFailurePolicy::ProceedWithoutContext => {
                    warn!(upstream = %previous.id, "Previous stage failed, continuing without its output");
                }
                UpstreamFailurePolicy::ProceedWithErrorText => {
                    input.prior_output = previous.output.clone().unwrap_or_default();
                }
                UpstreamFailurePolicy::FailDependents => {
                    input.upstream_failed = Some(previous.id);
                }
            },
            StageStatus::Pending | StageStatus::Running => {}
        }
        input
    }

    /// Returns every stage to pending and clears the run.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::AlreadyRunning`] if a run is in flight.
    pub fn reset(&self) -> Result<(), PipelineError> {
        let mut run = self.state.write();
        if run.running {
            return Err(PipelineError::AlreadyRunning);
        }
        run.reset();
        self.cancel.reset();
        Ok(())
    }

    /// Requests cancellation of the in-flight run.
    ///
    /// The current generation call is abandoned, its stage fails, and no
    /// further stages start. Has no effect when nothing is running.
    pub fn cancel(&self, reason: impl Into<String>) {
        let run = self.state.read();
        if run.running {
            self.cancel.cancel(reason);
        }
    }

    /// Replaces a completed stage's output.
    ///
    /// With `persist_edits` configured the edited output is saved first and
    /// only applied in memory once the save succeeds; otherwise the edit is
    /// memory-only until [`save_stage_output`](Self::save_stage_output).
    ///
    /// # Errors
    ///
    /// Fails if the stage is not part of the pipeline or has not completed,
    /// or if the save fails, in which case the stage keeps its old output.
    pub async fn edit_stage_output(
        &self,
        id: StageId,
        text: impl Into<String>,
    ) -> Result<(), PipelineError> {
        let text = text.into();
        if self.runner.config().persist_edits {
            let mut edited = self.completed_stage(id)?;
            edited.output = Some(text.clone());
            self.persist_output(&edited).await?;
        }

        let mut run = self.state.write();
        let stage = run
            .stage_mut(id)
            .ok_or(PipelineError::StageNotInPipeline(id))?;
        if stage.status != StageStatus::Completed {
            return Err(PipelineError::StageNotCompleted {
                stage: id,
                status: stage.status,
            });
        }
        stage.output = Some(text);
        Ok(())
    }

    /// Writes a completed stage's current output as a new content record.
    ///
    /// # Errors
    ///
    /// Fails if the stage is not part of the pipeline or has not completed,
    /// if no user is signed in, or if the write fails.
    pub async fn save_stage_output(&self, id: StageId) -> Result<ContentRecord, PipelineError> {
        let stage = self.completed_stage(id)?;
        self.persist_output(&stage).await
    }

    async fn persist_output(&self, stage: &Stage) -> Result<ContentRecord, PipelineError> {
        let user = self.identity.current_user().await?;
        let body = stage.output.as_deref().unwrap_or_default();

        let record = ContentRecord::for_stage(stage, body, &self.campaign_ref, &user);
        self.sink.create_content(&record).await?;
        self.sink
            .append_activity(&ActivityLogEntry::stage_edited(
                &user,
                stage,
                body.chars().count(),
            ))
            .await?;

        info!(stage = %stage.id, record_id = %record.id, "Saved stage output");
        Ok(record)
    }

    fn completed_stage(&self, id: StageId) -> Result<Stage, PipelineError> {
        let run = self.state.read();
        let stage = run.stage(id).ok_or(PipelineError::StageNotInPipeline(id))?;
        if stage.status != StageStatus::Completed {
            return Err(PipelineError::StageNotCompleted {
                stage: id,
                status: stage.status,
            });
        }
        Ok(stage.clone())
    }

    /// Returns a copy of the current run state.
    #[must_use]
    pub fn snapshot(&self) -> PipelineRun {
        self.state.read().clone()
    }

    /// Returns a copy of one stage.
    #[must_use]
    pub fn stage(&self, id: StageId) -> Option<Stage> {
        self.state.read().stage(id).cloned()
    }

    /// Returns the number of completed stages.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.state.read().completed_count()
    }

    /// Returns overall progress as a percentage of completed stages.
    #[must_use]
    pub fn overall_progress(&self) -> f64 {
        self.state.read().overall_progress()
    }

    /// Returns true when every stage has completed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state.read().is_complete()
    }

    /// Returns true while a run is in flight.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state.read().running
    }

    /// Returns the campaign reference stamped on content records.
    #[must_use]
    pub fn campaign_ref(&self) -> &str {
        &self.campaign_ref
    }

    /// Returns the attached campaign.
    #[must_use]
    pub fn campaign(&self) -> Option<&CampaignProfile> {
        self.campaign.as_ref()
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        self.runner.config()
    }
}
