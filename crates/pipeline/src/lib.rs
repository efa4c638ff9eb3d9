//! Core orchestration domain for issue-scribe.
//!
//! issue-scribe turns a reported issue into a tracked work item and a
//! published design document: it collects source context, asks a language
//! model for a structured specification, files the specification as a
//! tracker ticket, and publishes it as a wiki page.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed; infrastructure crates define *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`TicketKey`, `PageId`, `PipelineRunId`, etc.) |
//! | [`types`] | Data model (`IssueRequest`, `SourceContext`, `SpecificationRecord`, `Stage`) |
//! | [`config`] | Explicit run configuration and missing-value resolution |
//! | [`render`] | Prompt, tracker description, and wiki page rendering |
//! | [`ports`] | Traits implemented by infrastructure crates |
//! | [`outcome`] | Stage outcomes, run events, run report |
//! | [`errors`] | Component and pipeline error types |

pub mod config;
pub mod errors;
pub mod identifiers;
pub mod outcome;
pub mod ports;
pub mod render;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use config::{
    MissingConfiguration, ModelConfig, TrackerConfig, TrackerSettings, WikiConfig, WikiSettings,
};
pub use errors::{GenerationError, LlmError, PipelineError, PublishError};
pub use identifiers::{IssueNumber, ModelName, PageId, PipelineRunId, ProjectKey, SpaceKey, TicketKey};
pub use outcome::{NoopObserver, PublishOutcome, RunEvent, RunObserver, RunReport};
pub use ports::{
    CompletionRequest, ContextSource, DocumentWiki, LanguageModel, PageDraft, Publisher,
    TicketDraft, TicketTracker,
};
pub use types::{
    IssueRequest, PageReference, SourceContext, SpecificationRecord, Stage, TicketReference,
    Timestamp,
};
