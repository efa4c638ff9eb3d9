//! Document publishing stage.

use pipeline::render::{render_page_body, render_page_title};
use pipeline::{
    DocumentWiki, PageDraft, PageReference, PublishOutcome, Publisher, SpecificationRecord,
    TicketReference,
};
use tracing::{error, info, instrument, warn};

/// Publishes the specification as a wiki page, cross-linking the ticket when
/// one was created. Same non-fatal contract as [`crate::TicketPublisher`].
pub struct DocumentPublisher {
    wiki: Publisher<dyn DocumentWiki>,
}

impl DocumentPublisher {
    pub fn new(wiki: Publisher<dyn DocumentWiki>) -> Self {
        Self { wiki }
    }

    pub fn draft_for(
        wiki: &dyn DocumentWiki,
        spec: &SpecificationRecord,
        ticket: Option<&TicketReference>,
    ) -> PageDraft {
        PageDraft {
            space_key: wiki.space_key().clone(),
            title: render_page_title(spec, ticket),
            body: render_page_body(spec, ticket),
        }
    }

    #[instrument(skip_all, fields(linked = ticket.is_some()))]
    pub async fn publish(
        &self,
        spec: &SpecificationRecord,
        ticket: Option<&TicketReference>,
    ) -> PublishOutcome<PageReference> {
        let wiki = match &self.wiki {
            Publisher::Enabled(wiki) => wiki,
            Publisher::Disabled(missing) => {
                warn!(%missing, "page creation skipped");
                return PublishOutcome::Skipped(missing.clone());
            }
        };

        let draft = Self::draft_for(&**wiki, spec, ticket);
        match wiki.create_page(&draft).await {
            Ok(page) => {
                info!(page_id = %page.id, title = %page.title, "page created");
                PublishOutcome::Published(page)
            }
            Err(e) => {
                error!(error = %e, "page creation failed");
                PublishOutcome::Failed(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{FakeWiki, VALID_REPLY};
    use pipeline::{MissingConfiguration, TicketKey};

    fn spec() -> SpecificationRecord {
        SpecificationRecord::from_json(VALID_REPLY).unwrap()
    }

    #[tokio::test]
    async fn unlinked_page_uses_bare_summary() {
        let wiki = FakeWiki::succeeding("98765");
        let drafts = wiki.drafts();
        let publisher = DocumentPublisher::new(Publisher::Enabled(Box::new(wiki)));

        let outcome = publisher.publish(&spec(), None).await;

        assert_eq!(outcome.reference().unwrap().id.as_str(), "98765");
        let drafts = drafts.lock().unwrap();
        assert_eq!(drafts[0].title, "Add CSV export");
        assert_eq!(drafts[0].space_key.as_str(), "DOCS");
        assert!(drafts[0].body.contains("Line1<br/>Line2"));
        assert!(!drafts[0].body.contains("<a href"));
    }

    #[tokio::test]
    async fn linked_page_references_ticket() {
        let wiki = FakeWiki::succeeding("1");
        let drafts = wiki.drafts();
        let publisher = DocumentPublisher::new(Publisher::Enabled(Box::new(wiki)));
        let ticket = TicketReference {
            key: TicketKey::new("PROJ-42").unwrap(),
            browse_url: "https://tracker.example.com/browse/PROJ-42".into(),
        };

        publisher.publish(&spec(), Some(&ticket)).await;

        let drafts = drafts.lock().unwrap();
        assert_eq!(drafts[0].title, "[PROJ-42] Add CSV export");
        assert!(drafts[0].body.contains("/browse/PROJ-42\""));
    }

    #[tokio::test]
    async fn disabled_wiki_is_skipped() {
        let publisher = DocumentPublisher::new(Publisher::Disabled(MissingConfiguration {
            component: "wiki",
            fields: vec!["url", "identity", "credential", "space_key"],
        }));
        assert!(matches!(
            publisher.publish(&spec(), None).await,
            PublishOutcome::Skipped(_)
        ));
    }

    #[tokio::test]
    async fn remote_failure_is_reported() {
        let publisher = DocumentPublisher::new(Publisher::Enabled(Box::new(FakeWiki::failing())));
        assert!(publisher.publish(&spec(), None).await.is_failed());
    }
}
