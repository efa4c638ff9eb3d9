//! Error types for the issue-scribe pipeline domain.
//!
//! [`PipelineError`] covers conditions that abort the run. Component-level
//! errors ([`LlmError`], [`PublishError`]) are produced by infrastructure
//! adapters behind the port traits and are classified here so the
//! orchestration layer can decide whether they are fatal.

use thiserror::Error;

use crate::MissingConfiguration;

// ---------------------------------------------------------------------------
// Component errors
// ---------------------------------------------------------------------------

/// Failure of a call to the language-model service.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The request did not complete within the configured timeout.
    #[error("model request timed out")]
    Timeout,

    /// The request could not be sent or the response could not be read.
    #[error("model request failed: {0}")]
    Transport(String),

    /// The service answered with a non-2xx status.
    #[error("model service returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as far as it could be read.
        body: String,
    },

    /// The response envelope did not contain a completion.
    #[error("malformed model response: {0}")]
    MalformedResponse(String),
}

/// Failure of a call to the issue tracker or the wiki.
///
/// Never fatal: the publishing stages fold every variant into a
/// [`crate::PublishOutcome::Failed`] and the run continues.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The request could not be sent or the response could not be read.
    #[error("request failed: {0}")]
    Transport(String),

    /// The service answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as far as it could be read.
        body: String,
    },

    /// The service answered 2xx but the body lacked the expected identifier.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

// ---------------------------------------------------------------------------
// Stage errors
// ---------------------------------------------------------------------------

/// Failure of the specification generation stage. Always fatal.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The model call itself failed.
    #[error(transparent)]
    Model(#[from] LlmError),

    /// The model replied, but not with a complete specification object.
    #[error("model reply is not a valid specification: {0}")]
    InvalidSpecification(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Pipeline-level errors
// ---------------------------------------------------------------------------

/// Errors that abort the run with a non-zero exit status.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The specification could not be generated.
    #[error("specification generation failed: {0}")]
    Generation(#[from] GenerationError),

    /// Required configuration is absent (the model credential).
    #[error("configuration error: {0}")]
    Configuration(MissingConfiguration),
}
