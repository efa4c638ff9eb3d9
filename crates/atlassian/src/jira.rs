//! Jira adapter for [`pipeline::TicketTracker`].

use async_trait::async_trait;
use pipeline::{ProjectKey, PublishError, TicketDraft, TicketKey, TicketReference, TicketTracker, TrackerConfig};
use reqwest::Client;
use serde::Serialize;
use tracing::instrument;

use crate::http::{build_client, identifier_field, post_json, BasicAuth};

/// Issue-creation endpoint. API version 2 accepts the description as wiki
/// markup, which is what the rendered description is.
const CREATE_ISSUE_PATH: &str = "/rest/api/2/issue";

#[derive(Debug, Serialize)]
struct CreateIssue<'a> {
    fields: IssueFields<'a>,
}

#[derive(Debug, Serialize)]
struct IssueFields<'a> {
    project: KeyRef<'a>,
    summary: &'a str,
    description: &'a str,
    issuetype: NameRef<'a>,
}

#[derive(Debug, Serialize)]
struct KeyRef<'a> {
    key: &'a str,
}

#[derive(Debug, Serialize)]
struct NameRef<'a> {
    name: &'a str,
}

pub struct JiraClient {
    base_url: String,
    project_key: ProjectKey,
    auth: BasicAuth,
    client: Client,
}

impl JiraClient {
    pub fn new(config: TrackerConfig) -> Result<Self, PublishError> {
        let client = build_client(config.timeout)?;
        Ok(Self {
            base_url: config.base_url,
            project_key: config.project_key,
            auth: BasicAuth {
                identity: config.identity,
                credential: config.credential,
            },
            client,
        })
    }

    /// Human-facing URL of the ticket with `key`.
    pub fn browse_url(&self, key: &TicketKey) -> String {
        format!("{}/browse/{key}", self.base_url)
    }
}

#[async_trait]
impl TicketTracker for JiraClient {
    fn project_key(&self) -> &ProjectKey {
        &self.project_key
    }

    #[instrument(skip_all, fields(project = %draft.project_key))]
    async fn create_ticket(&self, draft: &TicketDraft) -> Result<TicketReference, PublishError> {
        let payload = CreateIssue {
            fields: IssueFields {
                project: KeyRef {
                    key: draft.project_key.as_str(),
                },
                summary: &draft.summary,
                description: &draft.description,
                issuetype: NameRef {
                    name: &draft.issue_type,
                },
            },
        };

        let url = format!("{}{CREATE_ISSUE_PATH}", self.base_url);
        let body = post_json(&self.client, &self.auth, &url, &payload).await?;

        let key = identifier_field(&body, "key")
            .and_then(TicketKey::new)
            .ok_or_else(|| PublishError::MalformedResponse(format!("no issue key in {body}")))?;

        Ok(TicketReference {
            browse_url: self.browse_url(&key),
            key,
        })
    }
}
