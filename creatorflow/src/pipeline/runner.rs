//! Executes a single stage against the generation client.

use super::ticker::ProgressTicker;
use super::SharedRun;
use crate::cancellation::CancellationToken;
use crate::config::PipelineConfig;
use crate::context::{IdentityProvider, UserId};
use crate::core::{ActivityLogEntry, ContentRecord, PipelineEvent, Stage, StageId};
use crate::errors::{GenerationError, PersistenceError};
use crate::events::EventSink;
use crate::generation::GenerationClient;
use crate::persistence::PersistenceSink;
use crate::prompts;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, info_span, warn, Instrument};

/// Inputs a stage receives from the orchestrator.
#[derive(Debug, Clone, Default)]
pub struct StageInput<'a> {
    /// Output of the previous stage, empty for the first stage.
    pub prior_output: String,
    /// Rendered campaign context, if a campaign is attached.
    pub campaign_context: Option<&'a str>,
    /// Campaign reference stamped on content records.
    pub campaign_ref: &'a str,
    /// Set when the previous stage failed and dependents must fail too.
    pub upstream_failed: Option<StageId>,
}

/// Runs one stage: prompt, generation call, state transition and persistence.
#[derive(Clone)]
pub struct StageRunner {
    client: Arc<dyn GenerationClient>,
    sink: Arc<dyn PersistenceSink>,
    identity: Arc<dyn IdentityProvider>,
    events: Arc<dyn EventSink>,
    config: PipelineConfig,
}

impl std::fmt::Debug for StageRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageRunner")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl StageRunner {
    /// Creates a runner.
    #[must_use]
    pub fn new(
        client: Arc<dyn GenerationClient>,
        sink: Arc<dyn PersistenceSink>,
        identity: Arc<dyn IdentityProvider>,
        events: Arc<dyn EventSink>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            client,
            sink,
            identity,
            events,
            config,
        }
    }

    /// Returns the runner's configuration.
    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs the stage at `index` and returns its final state.
    ///
    /// The stage always ends Completed or Failed. Generation, identity and
    /// cancellation errors are recorded on the stage; persistence errors are
    /// logged and reported as events without failing the stage.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range for the run.
    pub async fn run_stage(
        &self,
        state: &SharedRun,
        index: usize,
        input: &StageInput<'_>,
        cancel: &CancellationToken,
    ) -> Stage {
        let id = {
            let mut run = state.write();
            let stage = &mut run.stages[index];
            stage.start();
            self.events.publish(&PipelineEvent::stage_started(stage.id));
            stage.id
        };

        let span = info_span!("stage", stage = %id, index);
        self.execute(state, index, id, input, cancel)
            .instrument(span)
            .await
    }

    async fn execute(
        &self,
        state: &SharedRun,
        index: usize,
        id: StageId,
        input: &StageInput<'_>,
        cancel: &CancellationToken,
    ) -> Stage {
        if let Some(upstream) = input.upstream_failed {
            return self.fail(state, index, &format!("upstream stage '{upstream}' failed"));
        }

        let user = match self.identity.current_user().await {
            Ok(user) => user,
            Err(e) => return self.fail(state, index, &e.to_string()),
        };

        let definition = prompts::definition(id);
        let prompt = definition.render(&input.prior_output, input.campaign_context);
        let options = self.config.generation_options(definition.search_augmented);
        debug!(prompt_chars = prompt.len(), search = options.allow_search_augmentation, "Built prompt");

        let started = Instant::now();
        let ticker = ProgressTicker::start(
            state.clone(),
            index,
            &self.config.ticker,
            self.events.clone(),
        );

        let result = tokio::select! {
            result = self.client.generate(&prompt, &options) => result,
            () = cancel.cancelled() => Err(GenerationError::Cancelled(
                cancel.reason().unwrap_or_else(|| "cancelled".to_string()),
            )),
        };
        ticker.stop().await;

        let response = match result {
            Ok(response) => response,
            Err(e) => return self.fail(state, index, &e.to_string()),
        };

        let duration_ms = started.elapsed().as_secs_f64() * 1000.0;
        let chars = response.text.chars().count();
        let stage = {
            let mut run = state.write();
            let stage = &mut run.stages[index];
            stage.complete(response.text);
            self.events
                .publish(&PipelineEvent::stage_completed(id, duration_ms, chars));
            stage.clone()
        };
        info!(duration_ms, chars, model = ?response.model, "Stage completed");

        if let Err(e) = self.persist(&stage, input.campaign_ref, &user, chars).await {
            warn!(error = %e, "Failed to persist stage output");
            self.events
                .publish(&PipelineEvent::persistence_failed(id, &e.to_string()));
        }

        stage
    }

    fn fail(&self, state: &SharedRun, index: usize, message: &str) -> Stage {
        let stage = {
            let mut run = state.write();
            let stage = &mut run.stages[index];
            stage.fail(message);
            self.events
                .publish(&PipelineEvent::stage_failed(stage.id, message));
            stage.clone()
        };
        warn!(error = message, "Stage failed");
        stage
    }

    // The activity entry is skipped when the content write fails.
    async fn persist(
        &self,
        stage: &Stage,
        campaign_ref: &str,
        user: &UserId,
        chars: usize,
    ) -> Result<(), PersistenceError> {
        let body = stage.output.as_deref().unwrap_or_default();
        let record = ContentRecord::for_stage(stage, body, campaign_ref, user);
        self.sink.create_content(&record).await?;
        self.sink
            .append_activity(&ActivityLogEntry::stage_completed(user, stage, chars))
            .await?;
        debug!(record_id = %record.id, "Persisted stage output");
        Ok(())
    }
}
