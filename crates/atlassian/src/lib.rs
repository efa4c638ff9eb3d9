//! issue-scribe tracker and wiki infrastructure adapters.
//!
//! Implements [`pipeline::TicketTracker`] for Jira ([`JiraClient`]) and
//! [`pipeline::DocumentWiki`] for Confluence ([`ConfluenceClient`]) over their
//! REST APIs with basic authentication.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Endpoint paths, payload shapes, authentication and
//! response decoding live here. The [`pipeline`] crate sees only the port
//! traits. Neither client retries; every failure is returned as a
//! [`pipeline::PublishError`] for the publishing stage to log and fold into a
//! non-fatal outcome.

mod confluence;
mod http;
mod jira;

pub use confluence::ConfluenceClient;
pub use jira::JiraClient;
