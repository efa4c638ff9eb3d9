//! issue-scribe language-model infrastructure adapter.
//!
//! Implements the [`pipeline::LanguageModel`] trait for OpenAI-compatible
//! chat-completions services.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** HTTP transport, request formatting and response
//! envelope parsing live here. The [`pipeline`] crate sees only
//! [`pipeline::LanguageModel`] and receives the completion text unparsed.
//!
//! One request per call, no retries. Timeouts, transport errors, non-2xx
//! statuses and envelopes without a completion are all reported as
//! [`pipeline::LlmError`] and are fatal to the run.

use async_trait::async_trait;
use pipeline::{CompletionRequest, LanguageModel, LlmError, ModelConfig};
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// User-Agent string for model requests.
const USER_AGENT: &str = concat!("issue-scribe/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

/// Chat-completions client for OpenAI and compatible services.
pub struct OpenAiProvider {
    config: ModelConfig,
    client: Client,
}

impl OpenAiProvider {
    /// Builds the provider and its HTTP client (with the configured timeout).
    pub fn new(config: ModelConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, client })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }
}

#[async_trait]
impl LanguageModel for OpenAiProvider {
    #[instrument(skip_all, fields(model = %self.config.model))]
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let body = ChatRequest {
            model: self.config.model.as_str(),
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            temperature: request.temperature,
            response_format: request.json_object.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(self.config.credential.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: ChatResponse = response
            .json()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    transport_error(e)
                } else {
                    LlmError::MalformedResponse(e.to_string())
                }
            })?;

        let content = envelope
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::MalformedResponse("response has no completion".into()))?;

        debug!(chars = content.chars().count(), "completion received");
        Ok(content)
    }
}

fn transport_error(e: reqwest::Error) -> LlmError {
    if e.is_timeout() {
        LlmError::Timeout
    } else {
        LlmError::Transport(e.to_string())
    }
}
