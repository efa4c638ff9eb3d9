//! issue-scribe pipeline stages and executor.
//!
//! ## Architectural Layer
//!
//! **Orchestration layer.** Stages sequence calls between the rendering and
//! parsing rules in the [`pipeline`] crate and the port traits implemented by
//! infrastructure crates. They contain no transport details of their own.
//!
//! | Stage | Type | Failure mode |
//! |-------|------|--------------|
//! | Collecting | [`pipeline::ContextSource`] | never fails |
//! | Generating | [`SpecificationGenerator`] | fatal |
//! | PublishingTicket | [`TicketPublisher`] | skip or fail, continue |
//! | PublishingDoc | [`DocumentPublisher`] | skip or fail, continue |

mod document;
mod executor;
mod specification;
mod ticket;

#[cfg(test)]
mod fakes;

pub use document::DocumentPublisher;
pub use executor::PipelineExecutor;
pub use specification::SpecificationGenerator;
pub use ticket::TicketPublisher;
