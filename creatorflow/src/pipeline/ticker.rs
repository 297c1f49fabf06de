//! Cosmetic progress ticker for a running stage.

use super::SharedRun;
use crate::config::TickerConfig;
use crate::core::{PipelineEvent, StageStatus};
use crate::events::EventSink;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::warn;

/// Advances a stage's progress on a timer while its generation call is in flight.
///
/// The background task is aborted when the ticker is stopped or dropped, so
/// no timer outlives the stage that started it.
#[derive(Debug)]
pub struct ProgressTicker {
    handle: Option<JoinHandle<()>>,
}

impl ProgressTicker {
    /// Starts ticking the stage at `index`.
    ///
    /// A disabled config yields an idle ticker, as does a zero interval or
    /// step, which are refused with a warning.
    #[must_use]
    pub fn start(
        state: SharedRun,
        index: usize,
        config: &TickerConfig,
        events: Arc<dyn EventSink>,
    ) -> Self {
        if !config.enabled {
            return Self { handle: None };
        }
        if config.interval_ms == 0 || config.step == 0 {
            warn!(
                interval_ms = config.interval_ms,
                step = config.step,
                "Ignoring progress ticker with zero interval or step"
            );
            return Self { handle: None };
        }

        let period = config.interval();
        let (step, cap) = (config.step, config.cap);

        let handle = tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticks.tick().await;

                // Emit under the lock so progress events never trail the stage's final event.
                let mut run = state.write();
                let Some(stage) = run.stages.get_mut(index) else {
                    break;
                };
                if stage.status != StageStatus::Running {
                    break;
                }
                if let Some(progress) = stage.advance_progress(step, cap) {
                    events.publish(&PipelineEvent::stage_progress(stage.id, progress));
                }
            }
        });

        Self {
            handle: Some(handle),
        }
    }

    /// Returns whether a background task was spawned.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    /// Stops the ticker and waits for its task to finish.
    pub async fn stop(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            if let Err(e) = handle.await {
                if e.is_panic() {
                    warn!(error = %e, "Progress ticker panicked");
                }
            }
        }
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
