//! In-memory port implementations for stage and executor tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pipeline::{
    CompletionRequest, ContextSource, DocumentWiki, IssueNumber, IssueRequest, LanguageModel,
    LlmError, PageDraft, PageId, PageReference, ProjectKey, PublishError, RunEvent, RunObserver,
    SourceContext, SpaceKey, TicketDraft, TicketKey, TicketReference, TicketTracker,
};

pub const VALID_REPLY: &str = r#"{
    "summary": "Add CSV export",
    "description": "Export the user list as CSV.",
    "acceptance_criteria": ["A", "B"],
    "confluence_content": "Line1\nLine2"
}"#;

pub fn issue() -> IssueRequest {
    IssueRequest {
        id: IssueNumber::new(7),
        title: "Export users".into(),
        body: "We need a CSV export.".into(),
    }
}

// ---------------------------------------------------------------------------

pub struct StaticContext(pub SourceContext);

impl ContextSource for StaticContext {
    fn collect(&self) -> SourceContext {
        self.0.clone()
    }
}

// ---------------------------------------------------------------------------

pub struct FakeModel {
    reply: Result<String, fn() -> LlmError>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl FakeModel {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            requests: Arc::default(),
        }
    }

    pub fn failing(error: fn() -> LlmError) -> Self {
        Self {
            reply: Err(error),
            requests: Arc::default(),
        }
    }

    pub fn requests(&self) -> Arc<Mutex<Vec<CompletionRequest>>> {
        Arc::clone(&self.requests)
    }
}

#[async_trait]
impl LanguageModel for FakeModel {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(error) => Err(error()),
        }
    }
}

// ---------------------------------------------------------------------------

pub struct FakeTracker {
    project_key: ProjectKey,
    key: Option<String>,
    drafts: Arc<Mutex<Vec<TicketDraft>>>,
}

impl FakeTracker {
    pub fn succeeding(key: &str) -> Self {
        Self {
            project_key: ProjectKey::new("PROJ").unwrap(),
            key: Some(key.to_string()),
            drafts: Arc::default(),
        }
    }

    pub fn failing() -> Self {
        Self {
            project_key: ProjectKey::new("PROJ").unwrap(),
            key: None,
            drafts: Arc::default(),
        }
    }

    pub fn drafts(&self) -> Arc<Mutex<Vec<TicketDraft>>> {
        Arc::clone(&self.drafts)
    }
}

#[async_trait]
impl TicketTracker for FakeTracker {
    fn project_key(&self) -> &ProjectKey {
        &self.project_key
    }

    async fn create_ticket(&self, draft: &TicketDraft) -> Result<TicketReference, PublishError> {
        self.drafts.lock().unwrap().push(draft.clone());
        match &self.key {
            Some(key) => Ok(TicketReference {
                key: TicketKey::new(key.as_str()).unwrap(),
                browse_url: format!("https://tracker.example.com/browse/{key}"),
            }),
            None => Err(PublishError::Status {
                status: 500,
                body: "internal error".into(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------

pub struct FakeWiki {
    space_key: SpaceKey,
    id: Option<String>,
    drafts: Arc<Mutex<Vec<PageDraft>>>,
}

impl FakeWiki {
    pub fn succeeding(id: &str) -> Self {
        Self {
            space_key: SpaceKey::new("DOCS").unwrap(),
            id: Some(id.to_string()),
            drafts: Arc::default(),
        }
    }

    pub fn failing() -> Self {
        Self {
            space_key: SpaceKey::new("DOCS").unwrap(),
            id: None,
            drafts: Arc::default(),
        }
    }

    pub fn drafts(&self) -> Arc<Mutex<Vec<PageDraft>>> {
        Arc::clone(&self.drafts)
    }
}

#[async_trait]
impl DocumentWiki for FakeWiki {
    fn space_key(&self) -> &SpaceKey {
        &self.space_key
    }

    async fn create_page(&self, draft: &PageDraft) -> Result<PageReference, PublishError> {
        self.drafts.lock().unwrap().push(draft.clone());
        match &self.id {
            Some(id) => Ok(PageReference {
                id: PageId::new(id.as_str()).unwrap(),
                title: draft.title.clone(),
            }),
            None => Err(PublishError::Timeout),
        }
    }
}

// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RecordingObserver(pub Arc<Mutex<Vec<RunEvent>>>);

impl RunObserver for RecordingObserver {
    fn on_event(&self, event: &RunEvent) {
        self.0.lock().unwrap().push(event.clone());
    }
}
