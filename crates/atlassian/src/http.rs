//! Shared HTTP plumbing for the Jira and Confluence clients.

use std::time::Duration;

use pipeline::PublishError;
use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{debug, error};

/// User-Agent string for tracker and wiki requests.
const USER_AGENT: &str = concat!("issue-scribe/", env!("CARGO_PKG_VERSION"));

/// Build a reqwest client with the given request timeout.
pub(crate) fn build_client(timeout: Duration) -> Result<Client, PublishError> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| PublishError::Transport(format!("failed to build HTTP client: {e}")))
}

/// Basic-auth credentials shared by both services.
pub(crate) struct BasicAuth {
    pub identity: String,
    pub credential: SecretString,
}

impl BasicAuth {
    fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        request.basic_auth(&self.identity, Some(self.credential.expose_secret()))
    }
}

/// POSTs `payload` as JSON and returns the decoded JSON response body.
///
/// Non-2xx responses are logged with their body and mapped to
/// [`PublishError::Status`].
pub(crate) async fn post_json<T: Serialize + ?Sized>(
    client: &Client,
    auth: &BasicAuth,
    url: &str,
    payload: &T,
) -> Result<serde_json::Value, PublishError> {
    debug!(%url, "sending request");
    let response = auth
        .apply(client.post(url))
        .header(reqwest::header::ACCEPT, "application/json")
        .json(payload)
        .send()
        .await
        .map_err(transport_error)?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        error!(status = status.as_u16(), response = %body, "request rejected");
        return Err(PublishError::Status {
            status: status.as_u16(),
            body,
        });
    }

    response
        .json()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                transport_error(e)
            } else {
                PublishError::MalformedResponse(e.to_string())
            }
        })
}

/// Reads a non-empty identifier field that may be encoded as a string or a number.
pub(crate) fn identifier_field(body: &serde_json::Value, field: &str) -> Option<String> {
    match body.get(field)? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn transport_error(e: reqwest::Error) -> PublishError {
    if e.is_timeout() {
        PublishError::Timeout
    } else {
        PublishError::Transport(e.to_string())
    }
}
