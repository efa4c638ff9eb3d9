//! Ticket publishing stage.

use pipeline::render::{render_ticket_description, TICKET_ISSUE_TYPE};
use pipeline::{PublishOutcome, Publisher, SpecificationRecord, TicketDraft, TicketReference, TicketTracker};
use tracing::{error, info, instrument, warn};

/// Files the specification as a tracker ticket.
///
/// Never fails the run: missing configuration yields
/// [`PublishOutcome::Skipped`] without any network call, and a remote failure
/// yields [`PublishOutcome::Failed`].
pub struct TicketPublisher {
    tracker: Publisher<dyn TicketTracker>,
}

impl TicketPublisher {
    pub fn new(tracker: Publisher<dyn TicketTracker>) -> Self {
        Self { tracker }
    }

    /// Builds the draft submitted for `spec`.
    pub fn draft_for(tracker: &dyn TicketTracker, spec: &SpecificationRecord) -> TicketDraft {
        TicketDraft {
            project_key: tracker.project_key().clone(),
            summary: spec.summary.clone(),
            description: render_ticket_description(spec),
            issue_type: TICKET_ISSUE_TYPE.to_string(),
        }
    }

    #[instrument(skip_all)]
    pub async fn publish(&self, spec: &SpecificationRecord) -> PublishOutcome<TicketReference> {
        let tracker = match &self.tracker {
            Publisher::Enabled(tracker) => tracker,
            Publisher::Disabled(missing) => {
                warn!(%missing, "ticket creation skipped");
                return PublishOutcome::Skipped(missing.clone());
            }
        };

        let draft = Self::draft_for(&**tracker, spec);
        match tracker.create_ticket(&draft).await {
            Ok(ticket) => {
                info!(ticket_key = %ticket.key, "ticket created");
                PublishOutcome::Published(ticket)
            }
            Err(e) => {
                error!(error = %e, "ticket creation failed");
                PublishOutcome::Failed(e)
            }
        }
    }
}
