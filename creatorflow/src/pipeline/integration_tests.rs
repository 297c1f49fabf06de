//! End-to-end tests for pipeline execution.

#[cfg(test)]
mod tests {
    use crate::config::{TickerConfig, UpstreamFailurePolicy};
    use crate::context::StaticIdentity;
    use crate::core::{StageId, StageStatus, ACTION_STAGE_COMPLETED, ACTION_STAGE_EDITED};
    use crate::errors::{PersistenceError, PipelineError};
    use crate::events::CollectingEventSink;
    use crate::persistence::{InMemorySink, MockPersistenceSink, PersistenceSink};
    use crate::pipeline::{ContentPipeline, ContentPipelineBuilder};
    use crate::testing::{
        assert_all_pending, assert_output_contains, assert_stage_completed, assert_stage_failed,
        fast_config, sample_campaign, FailingSink, MockGenerationClient,
    };
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;

    struct Harness {
        pipeline: Arc<ContentPipeline>,
        client: Arc<MockGenerationClient>,
        sink: Arc<InMemorySink>,
        events: Arc<CollectingEventSink>,
    }

    fn harness(client: MockGenerationClient) -> Harness {
        harness_with(client, |b| b)
    }

    fn harness_with(
        client: MockGenerationClient,
        configure: impl FnOnce(ContentPipelineBuilder) -> ContentPipelineBuilder,
    ) -> Harness {
        let client = Arc::new(client);
        let sink = Arc::new(InMemorySink::new());
        let events = Arc::new(CollectingEventSink::new());
        let builder = ContentPipeline::builder(
            client.clone(),
            sink.clone(),
            Arc::new(StaticIdentity::new("user_1")),
        )
        .config(fast_config())
        .events(events.clone());

        Harness {
            pipeline: Arc::new(configure(builder).build().unwrap()),
            client,
            sink,
            events,
        }
    }

    #[tokio::test]
    async fn test_all_stages_complete_in_order() {
        let h = harness(
            MockGenerationClient::new(["generated"]).with_latency(Duration::from_millis(30)),
        );

        let summary = h.pipeline.run_all().await.unwrap();

        assert_eq!(summary.completed, 6);
        assert_eq!(summary.failed, 0);
        assert!(summary.all_completed);
        assert!(!summary.cancelled);

        let run = h.pipeline.snapshot();
        assert!(!run.running);
        assert_eq!(run.cursor, 5);
        for stage in &run.stages {
            assert_stage_completed(stage);
        }
        assert!(h.pipeline.is_complete());
        assert!((h.pipeline.overall_progress() - 100.0).abs() < f64::EPSILON);

        let started: Vec<String> = h
            .events
            .events_of_type("stage.started")
            .iter()
            .filter_map(|e| e.stage().map(str::to_string))
            .collect();
        let expected: Vec<String> = StageId::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(started, expected);

        let types = h.events.event_types();
        assert_eq!(types.first().map(String::as_str), Some("pipeline.started"));
        assert_eq!(types.last().map(String::as_str), Some("pipeline.completed"));
    }

    #[tokio::test]
    async fn test_progress_is_monotonic_and_ends_at_100() {
        let h = harness(
            MockGenerationClient::new(["generated"]).with_latency(Duration::from_millis(40)),
        );

        h.pipeline.run_all().await.unwrap();

        let mut last: HashMap<String, u64> = HashMap::new();
        let mut finished: Vec<String> = Vec::new();
        for event in h.events.events() {
            let stage = event.stage().unwrap_or_default().to_string();
            match event.event_type.as_str() {
                "stage.progress" => {
                    assert!(!finished.contains(&stage), "progress after completion for {stage}");
                    let progress = event.data["progress"].as_u64().unwrap();
                    let previous = last.insert(stage.clone(), progress).unwrap_or(0);
                    assert!(progress >= previous, "{stage} went from {previous} to {progress}");
                    assert!(progress <= 90);
                }
                "stage.completed" => finished.push(stage),
                _ => {}
            }
        }

        assert_eq!(finished.len(), 6);
        assert!(!last.is_empty(), "ticker should have reported progress");
        assert!(h.pipeline.snapshot().stages.iter().all(|s| s.progress == 100));
    }

    #[tokio::test]
    async fn test_failed_stage_does_not_stop_the_run() {
        let h = harness(MockGenerationClient::new(["ok"]).failing_on_call(3));

        let summary = h.pipeline.run_all().await.unwrap();

        assert_eq!(summary.completed, 5);
        assert_eq!(summary.failed, 1);
        assert!(!summary.all_completed);

        let run = h.pipeline.snapshot();
        assert_stage_completed(&run.stages[0]);
        assert_stage_completed(&run.stages[1]);
        assert_stage_failed(&run.stages[2]);
        for stage in &run.stages[3..] {
            assert_stage_completed(stage);
        }
        assert!(!h.pipeline.is_complete());
        assert_eq!(h.client.call_count(), 6);

        // No content for the failed stage.
        assert!(h.sink.content_for_stage(StageId::Creative).is_empty());
        assert_eq!(h.sink.content().len(), 5);
    }

    #[tokio::test]
    async fn test_reset_is_idempotent() {
        let h = harness(MockGenerationClient::new(["ok"]).failing_on_call(2));
        h.pipeline.run_all().await.unwrap();

        tokio_test::assert_ok!(h.pipeline.reset());
        let once = h.pipeline.snapshot();
        assert_all_pending(&once);
        assert_eq!(once.cursor, 0);
        assert!(!once.running);
        assert!(once.run_id.is_none());

        tokio_test::assert_ok!(h.pipeline.reset());
        assert_eq!(h.pipeline.snapshot(), once);
    }

    #[tokio::test]
    async fn test_prior_output_threads_into_next_prompt() {
        let h = harness(MockGenerationClient::new(["OUTPUT_A", "OUTPUT_B", "OUTPUT_C"]));

        h.pipeline.run_all().await.unwrap();

        let prompts = h.client.recorded_prompts();
        assert_eq!(prompts.len(), 6);
        assert!(!prompts[0].contains("OUTPUT_"));
        assert!(prompts[1].contains("OUTPUT_A"));
        assert!(prompts[2].contains("OUTPUT_B"));
        assert!(prompts[3].contains("OUTPUT_C"));

        let options = h.client.recorded_options();
        assert!(options[0].allow_search_augmentation);
        assert!(!options[2].allow_search_augmentation);
        assert!(options.iter().all(|o| o.max_tokens == 2000));
    }

    #[tokio::test]
    async fn test_never_two_stages_running() {
        let h = harness(
            MockGenerationClient::new(["ok"]).with_latency(Duration::from_millis(15)),
        );

        let pipeline = h.pipeline.clone();
        let run = tokio::spawn(async move { pipeline.run_all().await });

        let mut observations = 0;
        while !run.is_finished() {
            let snapshot = h.pipeline.snapshot();
            assert!(snapshot.running_count() <= 1, "two stages running: {snapshot:?}");
            observations += 1;
            tokio::time::sleep(Duration::from_millis(1)).await;
        }

        let summary = run.await.unwrap().unwrap();
        assert!(summary.all_completed);
        assert!(observations > 1);
    }

    #[tokio::test]
    async fn test_run_and_reset_rejected_while_running() {
        let h = harness(
            MockGenerationClient::new(["ok"]).with_latency(Duration::from_millis(50)),
        );

        let pipeline = h.pipeline.clone();
        let run = tokio::spawn(async move { pipeline.run_all().await });
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert!(h.pipeline.is_running());
        assert!(matches!(h.pipeline.run_all().await, Err(PipelineError::AlreadyRunning)));
        assert!(matches!(h.pipeline.reset(), Err(PipelineError::AlreadyRunning)));

        tokio_test::assert_ok!(run.await.unwrap());
        tokio_test::assert_ok!(h.pipeline.reset());
    }

    #[tokio::test]
    async fn test_persistence_failure_keeps_run_going() {
        let events = Arc::new(CollectingEventSink::new());
        let pipeline = ContentPipeline::builder(
            Arc::new(MockGenerationClient::new(["ok"])),
            Arc::new(FailingSink::new("store offline")),
            Arc::new(StaticIdentity::new("user_1")),
        )
        .config(fast_config())
        .events(events.clone())
        .build()
        .unwrap();

        let summary = pipeline.run_all().await.unwrap();

        assert!(summary.all_completed);
        assert_eq!(events.events_of_type("stage.persistence_failed").len(), 6);
    }

    #[tokio::test]
    async fn test_each_completed_stage_is_persisted_once() {
        let mut sink = MockPersistenceSink::new();
        sink.expect_create_content()
            .times(6)
            .returning(|record| {
                assert_eq!(record.content_type, "ai_generated");
                assert_eq!(record.campaign_ref, "camp_spring");
                Ok(())
            });
        sink.expect_append_activity()
            .times(6)
            .returning(|entry| {
                assert_eq!(entry.action, ACTION_STAGE_COMPLETED);
                Ok(())
            });
        sink.expect_create_campaign().never();

        let pipeline = ContentPipeline::builder(
            Arc::new(MockGenerationClient::new(["ok"])),
            Arc::new(sink),
            Arc::new(StaticIdentity::new("user_1")),
        )
        .config(fast_config())
        .campaign(sample_campaign())
        .build()
        .unwrap();

        assert!(pipeline.run_all().await.unwrap().all_completed);
    }

    #[tokio::test]
    async fn test_activity_skipped_when_content_write_fails() {
        let mut sink = MockPersistenceSink::new();
        sink.expect_create_content()
            .times(1)
            .returning(|_| Err(PersistenceError::write("content", "quota")));
        sink.expect_append_activity().never();

        let sink: Arc<dyn PersistenceSink> = Arc::new(sink);
        let pipeline = ContentPipeline::builder(
            Arc::new(MockGenerationClient::new(["ok"])),
            sink,
            Arc::new(StaticIdentity::new("user_1")),
        )
        .config(fast_config())
        .stages(&[StageId::Planning])
        .build()
        .unwrap();

        let summary = pipeline.run_all().await.unwrap();
        assert_eq!(summary.completed, 1);
    }

    #[tokio::test]
    async fn test_edit_then_save_writes_new_revision() {
        let h = harness(MockGenerationClient::new(["original plan"]));
        h.pipeline.run_all().await.unwrap();

        h.pipeline
            .edit_stage_output(StageId::Planning, "edited plan")
            .await
            .unwrap();
        assert_eq!(
            h.pipeline.stage(StageId::Planning).unwrap().output.as_deref(),
            Some("edited plan")
        );
        // Edits stay in memory until saved.
        assert_eq!(h.sink.content_for_stage(StageId::Planning).len(), 1);

        let record = h.pipeline.save_stage_output(StageId::Planning).await.unwrap();
        assert_eq!(record.body, "edited plan");

        let revisions = h.sink.content_for_stage(StageId::Planning);
        assert_eq!(revisions.len(), 2);
        assert_eq!(revisions[0].body, "original plan");
        assert_eq!(revisions[1].body, "edited plan");
        assert_ne!(revisions[0].id, revisions[1].id);

        let last = h.sink.activity().pop().unwrap();
        assert_eq!(last.action, ACTION_STAGE_EDITED);
    }

    #[tokio::test]
    async fn test_persist_edits_saves_immediately() {
        let h = harness_with(MockGenerationClient::new(["draft"]), |b| {
            b.config(fast_config().with_persist_edits(true))
                .stages(&[StageId::Planning, StageId::Brainstorming])
        });
        h.pipeline.run_all().await.unwrap();

        h.pipeline
            .edit_stage_output(StageId::Brainstorming, "better ideas")
            .await
            .unwrap();

        let revisions = h.sink.content_for_stage(StageId::Brainstorming);
        assert_eq!(revisions.len(), 2);
        assert_eq!(revisions[1].body, "better ideas");
    }

    #[tokio::test]
    async fn test_failed_edit_save_keeps_previous_output() {
        let mut sink = MockPersistenceSink::new();
        let mut writes = 0;
        sink.expect_create_content().times(2).returning(move |_| {
            writes += 1;
            if writes == 1 {
                Ok(())
            } else {
                Err(PersistenceError::write("content", "store offline"))
            }
        });
        sink.expect_append_activity().times(1).returning(|_| Ok(()));

        let pipeline = ContentPipeline::builder(
            Arc::new(MockGenerationClient::new(["generated plan"])),
            Arc::new(sink),
            Arc::new(StaticIdentity::new("user_1")),
        )
        .config(fast_config().with_persist_edits(true))
        .stages(&[StageId::Planning])
        .build()
        .unwrap();
        pipeline.run_all().await.unwrap();

        let err = pipeline
            .edit_stage_output(StageId::Planning, "edited plan")
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Persistence(_)));
        assert_output_contains(&pipeline.stage(StageId::Planning).unwrap(), "generated plan");
    }

    #[tokio::test]
    async fn test_cancellation_leaves_remaining_stages_pending() {
        let h = harness(
            MockGenerationClient::new(["ok"]).with_latency(Duration::from_millis(200)),
        );

        let pipeline = h.pipeline.clone();
        let run = tokio::spawn(async move { pipeline.run_all().await });
        tokio::time::sleep(Duration::from_millis(50)).await;
        h.pipeline.cancel("user pressed stop");

        let summary = run.await.unwrap().unwrap();
        assert!(summary.cancelled);
        assert!(!summary.all_completed);

        let snapshot = h.pipeline.snapshot();
        assert!(!snapshot.running);
        assert_eq!(snapshot.stages[0].output.as_deref(), Some("Error: cancelled: user pressed stop"));
        assert!(snapshot.stages[1..].iter().all(|s| s.status == StageStatus::Pending));
        assert_eq!(h.client.call_count(), 1);
        assert_eq!(h.events.events_of_type("pipeline.cancelled").len(), 1);

        // A fresh run after cancellation proceeds normally.
        let rerun = h.pipeline.run_all().await.unwrap();
        assert!(!rerun.cancelled);
    }

    #[tokio::test]
    async fn test_cancel_during_final_delay_is_not_a_cancellation() {
        let h = harness_with(MockGenerationClient::new(["ok"]), |b| {
            b.stages(&[StageId::Planning]).config(
                fast_config()
                    .with_ticker(TickerConfig::disabled())
                    .with_inter_stage_delay(Duration::from_millis(300)),
            )
        });

        let pipeline = h.pipeline.clone();
        let run = tokio::spawn(async move { pipeline.run_all().await });
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(h.pipeline.is_complete());
        assert!(h.pipeline.is_running());
        h.pipeline.cancel("stop");

        let summary = run.await.unwrap().unwrap();
        assert!(!summary.cancelled);
        assert!(summary.all_completed);
        assert_eq!(summary.completed, 1);

        assert_eq!(
            h.events.event_types(),
            vec![
                "pipeline.started",
                "stage.started",
                "stage.completed",
                "pipeline.completed",
            ]
        );
    }

    #[tokio::test]
    async fn test_cancel_between_stages_leaves_rest_pending() {
        let h = harness_with(MockGenerationClient::new(["ok"]), |b| {
            b.config(fast_config().with_inter_stage_delay(Duration::from_millis(300)))
        });

        let pipeline = h.pipeline.clone();
        let run = tokio::spawn(async move { pipeline.run_all().await });
        tokio::time::sleep(Duration::from_millis(100)).await;
        h.pipeline.cancel("stop");

        let summary = run.await.unwrap().unwrap();
        assert!(summary.cancelled);
        assert_eq!(summary.completed, 1);
        assert_stage_completed(&h.pipeline.snapshot().stages[0]);
        assert!(h.pipeline.snapshot().stages[1..]
            .iter()
            .all(|s| s.status == StageStatus::Pending));
        assert_eq!(h.events.events_of_type("pipeline.cancelled").len(), 1);
    }

    #[tokio::test]
    async fn test_dropped_run_reports_its_end() {
        let h = harness(
            MockGenerationClient::new(["ok"]).with_latency(Duration::from_millis(500)),
        );

        let outcome =
            tokio::time::timeout(Duration::from_millis(50), h.pipeline.run_all()).await;
        assert!(outcome.is_err());

        let snapshot = h.pipeline.snapshot();
        assert!(!snapshot.running);
        assert_eq!(snapshot.running_count(), 0);
        assert_eq!(snapshot.stages[0].output.as_deref(), Some("Error: run aborted"));
        assert!(snapshot.stages[1..].iter().all(|s| s.status == StageStatus::Pending));

        let types = h.events.event_types();
        assert_eq!(
            types.iter().rev().take(2).map(String::as_str).collect::<Vec<_>>(),
            vec!["pipeline.cancelled", "stage.failed"]
        );

        // The pipeline is usable again.
        tokio_test::assert_ok!(h.pipeline.reset());
    }

    #[tokio::test]
    async fn test_fail_dependents_policy() {
        let h = harness_with(MockGenerationClient::new(["ok"]).failing_on_call(1), |b| {
            b.config(fast_config().with_upstream_failure(UpstreamFailurePolicy::FailDependents))
                .stages(&[StageId::Planning, StageId::Brainstorming, StageId::Creative])
        });

        let summary = h.pipeline.run_all().await.unwrap();

        assert_eq!(summary.failed, 3);
        assert_eq!(h.client.call_count(), 1);
        let run = h.pipeline.snapshot();
        assert_output_contains(&run.stages[1], "upstream stage 'planning' failed");
        assert_output_contains(&run.stages[2], "upstream stage 'brainstorming' failed");
    }

    #[tokio::test]
    async fn test_proceed_without_context_policy() {
        let h = harness_with(MockGenerationClient::new(["ok"]).failing_on_call(1), |b| {
            b.stages(&[StageId::Planning, StageId::Brainstorming])
        });

        h.pipeline.run_all().await.unwrap();

        let prompts = h.client.recorded_prompts();
        assert!(!prompts[1].contains("Error:"));
        assert_stage_completed(&h.pipeline.snapshot().stages[1]);
    }

    #[tokio::test]
    async fn test_proceed_with_error_text_policy() {
        let h = harness_with(MockGenerationClient::new(["ok"]).failing_on_call(1), |b| {
            b.config(
                fast_config().with_upstream_failure(UpstreamFailurePolicy::ProceedWithErrorText),
            )
            .stages(&[StageId::Planning, StageId::Brainstorming])
        });

        h.pipeline.run_all().await.unwrap();

        let prompts = h.client.recorded_prompts();
        assert!(prompts[1].contains("Error: Generation request failed"));
    }

    #[tokio::test]
    async fn test_campaign_context_reaches_every_prompt() {
        let h = harness_with(MockGenerationClient::new(["ok"]), |b| b.campaign(sample_campaign()));

        h.pipeline.run_all().await.unwrap();

        for prompt in h.client.recorded_prompts() {
            assert!(prompt.contains("Campaign: Spring Launch"));
        }
        assert!(h
            .sink
            .content()
            .iter()
            .all(|r| r.campaign_ref == "camp_spring"));
    }
}
