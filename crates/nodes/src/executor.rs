//! The pipeline executor.
//!
//! Drives one run through `Collecting → Generating → PublishingTicket →
//! PublishingDoc → Done`, strictly in that order. Each stage runs to
//! completion (or skip) before the next begins. The only fatal edge leaves
//! `Generating`; both publishing stages always hand control onward.

use pipeline::{
    ContextSource, DocumentWiki, IssueRequest, LanguageModel, NoopObserver,
    PageReference, PipelineError, PipelineRunId, PublishOutcome, Publisher, RunEvent,
    RunObserver, RunReport, Stage, TicketReference, TicketTracker, Timestamp,
};
use tracing::{error, info, instrument};

use crate::{DocumentPublisher, SpecificationGenerator, TicketPublisher};

pub struct PipelineExecutor {
    context: Box<dyn ContextSource>,
    generator: SpecificationGenerator,
    tickets: TicketPublisher,
    documents: DocumentPublisher,
    observer: Box<dyn RunObserver>,
}

impl PipelineExecutor {
    pub fn new(
        context: Box<dyn ContextSource>,
        model: Box<dyn LanguageModel>,
        tracker: Publisher<dyn TicketTracker>,
        wiki: Publisher<dyn DocumentWiki>,
    ) -> Self {
        Self {
            context,
            generator: SpecificationGenerator::new(model),
            tickets: TicketPublisher::new(tracker),
            documents: DocumentPublisher::new(wiki),
            observer: Box::new(NoopObserver),
        }
    }

    /// Replaces the observer that receives progress events.
    pub fn with_observer(mut self, observer: Box<dyn RunObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Runs the pipeline once for `issue`.
    ///
    /// Returns `Err` only when the specification could not be generated; in
    /// that case neither publishing stage is entered.
    pub async fn run(&self, issue: &IssueRequest) -> Result<RunReport, PipelineError> {
        self.run_with_id(PipelineRunId::new_random(), issue).await
    }

    #[instrument(name = "pipeline_run", skip_all, fields(run_id = %run_id, issue = %issue.id))]
    async fn run_with_id(
        &self,
        run_id: PipelineRunId,
        issue: &IssueRequest,
    ) -> Result<RunReport, PipelineError> {
        let started_at = Timestamp::now();
        info!(title = %issue.title, "run started");

        self.enter(Stage::Collecting);
        let context = self.context.collect();
        info!(files = context.len(), "source context collected");
        self.emit(RunEvent::ContextCollected {
            files: context.len(),
        });

        self.enter(Stage::Generating);
        let spec = match self.generator.generate(issue, &context).await {
            Ok(spec) => spec,
            Err(e) => {
                error!(error = %e, "specification generation failed, aborting run");
                self.emit(RunEvent::GenerationFailed {
                    message: e.to_string(),
                });
                return Err(PipelineError::Generation(e));
            }
        };
        info!(summary = %spec.summary, "specification generated");
        self.emit(RunEvent::SpecificationGenerated {
            summary: spec.summary.clone(),
        });

        self.enter(Stage::PublishingTicket);
        let ticket = self.tickets.publish(&spec).await;
        self.emit(ticket_event(&ticket));

        self.enter(Stage::PublishingDoc);
        let page = self.documents.publish(&spec, ticket.reference()).await;
        self.emit(page_event(&page));

        self.enter(Stage::Done);
        self.emit(RunEvent::Finished);
        info!("run finished");

        Ok(RunReport {
            run_id,
            started_at,
            finished_at: Timestamp::now(),
            context_files: context.len(),
            summary: spec.summary,
            ticket,
            page,
        })
    }

    fn enter(&self, stage: Stage) {
        self.emit(RunEvent::StageStarted(stage));
    }

    fn emit(&self, event: RunEvent) {
        self.observer.on_event(&event);
    }
}

fn ticket_event(outcome: &PublishOutcome<TicketReference>) -> RunEvent {
    match outcome {
        PublishOutcome::Published(ticket) => RunEvent::TicketPublished {
            key: ticket.key.to_string(),
        },
        PublishOutcome::Skipped(missing) => RunEvent::TicketSkipped {
            reason: missing.to_string(),
        },
        PublishOutcome::Failed(e) => RunEvent::TicketFailed {
            message: e.to_string(),
        },
    }
}

fn page_event(outcome: &PublishOutcome<PageReference>) -> RunEvent {
    match outcome {
        PublishOutcome::Published(page) => RunEvent::PagePublished {
            id: page.id.to_string(),
            title: page.title.clone(),
        },
        PublishOutcome::Skipped(missing) => RunEvent::PageSkipped {
            reason: missing.to_string(),
        },
        PublishOutcome::Failed(e) => RunEvent::PageFailed {
            message: e.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{
        issue, FakeModel, FakeTracker, FakeWiki, RecordingObserver, StaticContext, VALID_REPLY,
    };
    use pipeline::{GenerationError, LlmError, MissingConfiguration, SourceContext, TrackerSettings};
    use std::sync::{Arc, Mutex};

    fn tracker_missing() -> MissingConfiguration {
        // Three of four values present.
        TrackerSettings {
            base_url: Some("https://tracker.example.com".into()),
            identity: Some("bot@example.com".into()),
            credential: None,
            project_key: Some("PROJ".into()),
        }
        .resolve()
        .unwrap_err()
    }

    fn context() -> Box<StaticContext> {
        Box::new(StaticContext(
            [("app.py".to_string(), "print('hi')".to_string())]
                .into_iter()
                .collect(),
        ))
    }

    #[tokio::test]
    async fn full_run_links_page_to_ticket() {
        let tracker = FakeTracker::succeeding("PROJ-42");
        let wiki = FakeWiki::succeeding("555");
        let pages = wiki.drafts();
        let executor = PipelineExecutor::new(
            context(),
            Box::new(FakeModel::replying(VALID_REPLY)),
            Publisher::Enabled(Box::new(tracker)),
            Publisher::Enabled(Box::new(wiki)),
        );

        let report = executor.run(&issue()).await.unwrap();

        assert_eq!(report.context_files, 1);
        assert_eq!(report.summary, "Add CSV export");
        assert_eq!(report.ticket.reference().unwrap().key.as_str(), "PROJ-42");
        assert_eq!(report.page.reference().unwrap().id.as_str(), "555");
        assert!(!report.has_publish_failure());
        assert!(report.started_at <= report.finished_at);

        let pages = pages.lock().unwrap();
        assert!(pages[0].title.starts_with("[PROJ-42] "));
        assert!(pages[0].body.contains("PROJ-42\""));
    }

    #[tokio::test]
    async fn invalid_reply_aborts_before_publishing() {
        let tracker = FakeTracker::succeeding("PROJ-1");
        let wiki = FakeWiki::succeeding("1");
        let tickets = tracker.drafts();
        let pages = wiki.drafts();
        let executor = PipelineExecutor::new(
            context(),
            Box::new(FakeModel::replying("I cannot help with that.")),
            Publisher::Enabled(Box::new(tracker)),
            Publisher::Enabled(Box::new(wiki)),
        );

        let err = executor.run(&issue()).await.unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Generation(GenerationError::InvalidSpecification(_))
        ));
        assert!(tickets.lock().unwrap().is_empty());
        assert!(pages.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn model_timeout_aborts_run() {
        let executor = PipelineExecutor::new(
            context(),
            Box::new(FakeModel::failing(|| LlmError::Timeout)),
            Publisher::Enabled(Box::new(FakeTracker::succeeding("PROJ-1"))),
            Publisher::Enabled(Box::new(FakeWiki::succeeding("1"))),
        );
        let err = executor.run(&issue()).await.unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Generation(GenerationError::Model(LlmError::Timeout))
        ));
    }

    #[tokio::test]
    async fn partial_tracker_config_skips_ticket_but_publishes_page() {
        let wiki = FakeWiki::succeeding("777");
        let pages = wiki.drafts();
        let executor = PipelineExecutor::new(
            context(),
            Box::new(FakeModel::replying(VALID_REPLY)),
            Publisher::Disabled(tracker_missing()),
            Publisher::Enabled(Box::new(wiki)),
        );

        let report = executor.run(&issue()).await.unwrap();

        assert!(matches!(report.ticket, PublishOutcome::Skipped(_)));
        assert!(report.page.reference().is_some());
        let pages = pages.lock().unwrap();
        assert_eq!(pages[0].title, "Add CSV export");
        assert!(!pages[0].body.contains("Related Ticket"));
    }

    #[tokio::test]
    async fn tracker_failure_still_publishes_unlinked_page() {
        let wiki = FakeWiki::succeeding("9");
        let pages = wiki.drafts();
        let executor = PipelineExecutor::new(
            context(),
            Box::new(FakeModel::replying(VALID_REPLY)),
            Publisher::Enabled(Box::new(FakeTracker::failing())),
            Publisher::Enabled(Box::new(wiki)),
        );

        let report = executor.run(&issue()).await.unwrap();

        assert!(report.ticket.is_failed());
        assert!(report.has_publish_failure());
        assert_eq!(pages.lock().unwrap()[0].title, "Add CSV export");
    }

    #[tokio::test]
    async fn empty_context_still_reaches_generation() {
        let model = FakeModel::replying(VALID_REPLY);
        let requests = model.requests();
        let executor = PipelineExecutor::new(
            Box::new(StaticContext(SourceContext::empty())),
            Box::new(model),
            Publisher::Disabled(tracker_missing()),
            Publisher::Disabled(MissingConfiguration {
                component: "wiki",
                fields: vec!["url"],
            }),
        );

        let report = executor.run(&issue()).await.unwrap();

        assert_eq!(report.context_files, 0);
        assert_eq!(requests.lock().unwrap().len(), 1);
        assert!(matches!(report.page, PublishOutcome::Skipped(_)));
    }

    #[tokio::test]
    async fn events_follow_stage_order() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let executor = PipelineExecutor::new(
            context(),
            Box::new(FakeModel::replying(VALID_REPLY)),
            Publisher::Enabled(Box::new(FakeTracker::succeeding("PROJ-3"))),
            Publisher::Enabled(Box::new(FakeWiki::failing())),
        )
        .with_observer(Box::new(RecordingObserver(Arc::clone(&events))));

        executor.run(&issue()).await.unwrap();

        let events = events.lock().unwrap();
        let stages: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                RunEvent::StageStarted(stage) => Some(*stage),
                _ => None,
            })
            .collect();
        assert_eq!(
            stages,
            vec![
                Stage::Collecting,
                Stage::Generating,
                Stage::PublishingTicket,
                Stage::PublishingDoc,
                Stage::Done
            ]
        );
        assert!(events.contains(&RunEvent::TicketPublished {
            key: "PROJ-3".into()
        }));
        assert!(events
            .iter()
            .any(|e| matches!(e, RunEvent::PageFailed { .. })));
        assert_eq!(events.last(), Some(&RunEvent::Finished));
    }

    #[tokio::test]
    async fn generation_failure_emits_no_publish_events() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let executor = PipelineExecutor::new(
            context(),
            Box::new(FakeModel::replying("{}")),
            Publisher::Enabled(Box::new(FakeTracker::succeeding("PROJ-3"))),
            Publisher::Enabled(Box::new(FakeWiki::succeeding("1"))),
        )
        .with_observer(Box::new(RecordingObserver(Arc::clone(&events))));

        assert!(executor.run(&issue()).await.is_err());

        let events = events.lock().unwrap();
        assert!(matches!(events.last(), Some(RunEvent::GenerationFailed { .. })));
        assert!(!events.contains(&RunEvent::StageStarted(Stage::PublishingTicket)));
    }
}
