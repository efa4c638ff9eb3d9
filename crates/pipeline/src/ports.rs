//! Port traits implemented by infrastructure crates.
//!
//! The orchestration layer sees only these traits. Each is object-safe so the
//! composition root can inject `Box<dyn …>` values and tests can substitute
//! in-memory fakes.

use async_trait::async_trait;

use crate::{
    LlmError, MissingConfiguration, PageReference, ProjectKey, PublishError, SourceContext,
    SpaceKey, TicketReference,
};

// ---------------------------------------------------------------------------
// Context source
// ---------------------------------------------------------------------------

/// Supplies the source context for a run.
///
/// Infallible by contract: an absent root yields an empty context and
/// unreadable files are omitted.
pub trait ContextSource: Send + Sync {
    /// Collects the context for this run.
    fn collect(&self) -> SourceContext;
}

// ---------------------------------------------------------------------------
// Language model
// ---------------------------------------------------------------------------

/// A single text-completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// System instruction framing the assistant's role.
    pub system: String,
    /// User prompt.
    pub prompt: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// When `true`, the service must reply with a single JSON object.
    pub json_object: bool,
}

/// Opaque text-completion service.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Sends one request and returns the completion text. No retries.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError>;
}

// ---------------------------------------------------------------------------
// Tracker
// ---------------------------------------------------------------------------

/// A ticket ready to be submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketDraft {
    pub project_key: ProjectKey,
    pub summary: String,
    /// Description with the acceptance criteria already appended.
    pub description: String,
    pub issue_type: String,
}

/// Issue-tracking system.
#[async_trait]
pub trait TicketTracker: Send + Sync {
    /// Project that drafts are filed under.
    fn project_key(&self) -> &ProjectKey;

    /// Creates a ticket and returns the tracker-assigned reference.
    async fn create_ticket(&self, draft: &TicketDraft) -> Result<TicketReference, PublishError>;
}

// ---------------------------------------------------------------------------
// Wiki
// ---------------------------------------------------------------------------

/// A page ready to be submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageDraft {
    pub space_key: SpaceKey,
    pub title: String,
    /// Storage-format HTML fragment.
    pub body: String,
}

/// Documentation wiki.
#[async_trait]
pub trait DocumentWiki: Send + Sync {
    /// Space that drafts are created in.
    fn space_key(&self) -> &SpaceKey;

    /// Creates a page and returns the wiki-assigned reference.
    async fn create_page(&self, draft: &PageDraft) -> Result<PageReference, PublishError>;
}

// ---------------------------------------------------------------------------
// Optional publishers
// ---------------------------------------------------------------------------

/// An optional publishing port: either configured, or disabled because
/// configuration is missing.
pub enum Publisher<T: ?Sized> {
    Enabled(Box<T>),
    Disabled(MissingConfiguration),
}

impl<T: ?Sized> std::fmt::Debug for Publisher<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Publisher::Enabled(_) => f.write_str("Enabled(..)"),
            Publisher::Disabled(missing) => f.debug_tuple("Disabled").field(missing).finish(),
        }
    }
}
