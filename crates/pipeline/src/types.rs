//! Data model for a single pipeline run.
//!
//! Every value here is created and consumed within one run; nothing persists
//! across runs and nothing is mutated after construction.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{IssueNumber, PageId, TicketKey};

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// The issue that triggered the run. Read-only input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRequest {
    /// Issue number in the source repository.
    pub id: IssueNumber,
    /// Issue title. May be empty.
    pub title: String,
    /// Issue body. May be empty.
    pub body: String,
}

/// Textual source context: relative file path → file contents.
///
/// Built once by the context source and immutable thereafter. Iteration order
/// is sorted by path so prompts are reproducible for the same tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceContext {
    files: BTreeMap<String, String>,
}

impl SourceContext {
    /// An empty context (used when the scan root is absent).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of files in the context.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if no files were collected.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Contents of the file at `path`, if collected.
    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    /// Iterates `(path, contents)` pairs in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files.iter().map(|(p, c)| (p.as_str(), c.as_str()))
    }
}

impl FromIterator<(String, String)> for SourceContext {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Specification record
// ---------------------------------------------------------------------------

/// Structured output of the generation stage.
///
/// All four fields are required when deserialising; a reply missing any of
/// them is rejected rather than default-filled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecificationRecord {
    /// One-line ticket title.
    pub summary: String,
    /// Detailed implementation specification.
    pub description: String,
    /// Ordered acceptance criteria.
    pub acceptance_criteria: Vec<String>,
    /// Long-form document content for the wiki page.
    pub confluence_content: String,
}

impl SpecificationRecord {
    /// Parses a model reply strictly as a JSON object of this shape.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Long-form content for the document: the dedicated document field, or
    /// the description when that field is blank.
    pub fn document_content(&self) -> &str {
        if self.confluence_content.trim().is_empty() {
            &self.description
        } else {
            &self.confluence_content
        }
    }
}

// ---------------------------------------------------------------------------
// Publishing references
// ---------------------------------------------------------------------------

/// A work item created in the issue tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketReference {
    /// Tracker-assigned key.
    pub key: TicketKey,
    /// Human-facing URL of the ticket, used for the wiki cross-link.
    pub browse_url: String,
}

/// A page created in the documentation wiki.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageReference {
    /// Wiki-assigned page identifier.
    pub id: PageId,
    /// Title the page was created with.
    pub title: String,
}

// ---------------------------------------------------------------------------
// Pipeline state machine
// ---------------------------------------------------------------------------

/// Stages of a run, in the only order they may occur.
///
/// `Collecting → Generating → PublishingTicket → PublishingDoc → Done`.
/// The only fatal edge leaves `Generating`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Collecting,
    Generating,
    PublishingTicket,
    PublishingDoc,
    Done,
}

impl Stage {
    /// One-based position among the four working stages, `None` for `Done`.
    pub fn ordinal(self) -> Option<u8> {
        match self {
            Stage::Collecting => Some(1),
            Stage::Generating => Some(2),
            Stage::PublishingTicket => Some(3),
            Stage::PublishingDoc => Some(4),
            Stage::Done => None,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Stage::Collecting => "collecting source context",
            Stage::Generating => "generating specification",
            Stage::PublishingTicket => "publishing ticket",
            Stage::PublishingDoc => "publishing document",
            Stage::Done => "done",
        };
        f.write_str(label)
    }
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current UTC time as a [`Timestamp`].
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Returns the underlying [`DateTime<Utc>`].
    pub fn as_datetime(self) -> DateTime<Utc> {
        self.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn specification_parses_complete_object() {
        let record = SpecificationRecord::from_json(
            r#"{"summary":"S","description":"D","acceptance_criteria":["A","B"],"confluence_content":"C"}"#,
        )
        .unwrap();
        assert_eq!(record.summary, "S");
        assert_eq!(record.acceptance_criteria, vec!["A", "B"]);
    }

    #[test]
    fn specification_rejects_missing_field() {
        let err = SpecificationRecord::from_json(
            r#"{"summary":"S","description":"D","acceptance_criteria":[]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("confluence_content"));
    }

    #[test]
    fn specification_rejects_null_field() {
        assert!(SpecificationRecord::from_json(
            r#"{"summary":null,"description":"D","acceptance_criteria":[],"confluence_content":"C"}"#,
        )
        .is_err());
    }

    #[test]
    fn specification_rejects_free_text() {
        assert!(SpecificationRecord::from_json("Sure! Here is the spec: {}").is_err());
    }

    #[test]
    fn document_content_falls_back_to_description() {
        let record = SpecificationRecord {
            summary: "S".into(),
            description: "the description".into(),
            acceptance_criteria: vec![],
            confluence_content: "  ".into(),
        };
        assert_eq!(record.document_content(), "the description");
    }

    #[test]
    fn source_context_iterates_in_path_order() {
        let ctx: SourceContext = [
            ("b.py".to_string(), "b".to_string()),
            ("a.py".to_string(), "a".to_string()),
        ]
        .into_iter()
        .collect();
        let paths: Vec<_> = ctx.iter().map(|(p, _)| p).collect();
        assert_eq!(paths, vec!["a.py", "b.py"]);
        assert_eq!(ctx.get("b.py"), Some("b"));
    }

    #[test]
    fn stage_ordinals_follow_pipeline_order() {
        assert_eq!(Stage::Collecting.ordinal(), Some(1));
        assert_eq!(Stage::PublishingDoc.ordinal(), Some(4));
        assert_eq!(Stage::Done.ordinal(), None);
        assert!(Stage::Generating < Stage::PublishingTicket);
    }
}
