//! Stage outcomes, run events, and the run report.

use crate::{
    MissingConfiguration, PageReference, PipelineRunId, PublishError, Stage, TicketReference,
    Timestamp,
};

// ---------------------------------------------------------------------------
// Publish outcome
// ---------------------------------------------------------------------------

/// Result of an optional publishing stage.
///
/// `Skipped` (feature disabled) and `Failed` (remote call failed) are kept
/// distinct so callers can decide independently how each affects exit status.
#[derive(Debug)]
pub enum PublishOutcome<T> {
    Published(T),
    Skipped(MissingConfiguration),
    Failed(PublishError),
}

impl<T> PublishOutcome<T> {
    /// The published reference, if any.
    pub fn reference(&self) -> Option<&T> {
        match self {
            PublishOutcome::Published(reference) => Some(reference),
            PublishOutcome::Skipped(_) | PublishOutcome::Failed(_) => None,
        }
    }

    /// Returns `true` if the remote call was attempted and failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, PublishOutcome::Failed(_))
    }
}

// ---------------------------------------------------------------------------
// Run events
// ---------------------------------------------------------------------------

/// Progress notifications emitted by the executor, in stage order.
#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    StageStarted(Stage),
    ContextCollected { files: usize },
    SpecificationGenerated { summary: String },
    GenerationFailed { message: String },
    TicketPublished { key: String },
    TicketSkipped { reason: String },
    TicketFailed { message: String },
    PagePublished { id: String, title: String },
    PageSkipped { reason: String },
    PageFailed { message: String },
    Finished,
}

/// Receives [`RunEvent`]s as the run progresses.
pub trait RunObserver: Send + Sync {
    fn on_event(&self, event: &RunEvent);
}

/// Observer that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl RunObserver for NoopObserver {
    fn on_event(&self, _event: &RunEvent) {}
}

// ---------------------------------------------------------------------------
// Run report
// ---------------------------------------------------------------------------

/// Summary of a run that reached [`Stage::Done`].
#[derive(Debug)]
pub struct RunReport {
    pub run_id: PipelineRunId,
    pub started_at: Timestamp,
    pub finished_at: Timestamp,
    /// Number of files in the collected context.
    pub context_files: usize,
    /// Summary line of the generated specification.
    pub summary: String,
    pub ticket: PublishOutcome<TicketReference>,
    pub page: PublishOutcome<PageReference>,
}

impl RunReport {
    /// Returns `true` if either publishing stage attempted a call and failed.
    pub fn has_publish_failure(&self) -> bool {
        self.ticket.is_failed() || self.page.is_failed()
    }
}
