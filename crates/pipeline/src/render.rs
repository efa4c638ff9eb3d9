//! Text rendering rules: the model prompt, the tracker description, and the
//! wiki page title and body.
//!
//! These are pure functions over the data model. Adapters send what is
//! rendered here verbatim.

use crate::{IssueRequest, SourceContext, SpecificationRecord, TicketReference};

/// Characters of each file embedded in the prompt.
pub const CONTEXT_PREVIEW_CHARS: usize = 500;

/// System instruction framing the assistant's role.
pub const SYSTEM_INSTRUCTION: &str = "You are an experienced software engineer. \
You turn an issue report and the existing source code into an implementation specification.";

/// Sampling temperature for the generation call.
pub const SAMPLING_TEMPERATURE: f32 = 0.7;

// ---------------------------------------------------------------------------
// Prompt
// ---------------------------------------------------------------------------

/// Renders every context file as a labelled, truncated block.
///
/// Each block is `=== path ===`, then at most [`CONTEXT_PREVIEW_CHARS`]
/// characters of content followed by `...`. Blocks are separated by a blank
/// line.
pub fn render_context_block(context: &SourceContext) -> String {
    context
        .iter()
        .map(|(path, content)| {
            let preview: String = content.chars().take(CONTEXT_PREVIEW_CHARS).collect();
            format!("=== {path} ===\n{preview}...")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Composes the user prompt for the generation call.
pub fn render_prompt(issue: &IssueRequest, context: &SourceContext) -> String {
    let context_block = render_context_block(context);
    format!(
        r#"Analyse the following issue and the existing code, then produce an implementation specification and a ticket proposal.

[Issue title]
{title}

[Issue body]
{body}

[Existing code]
{context_block}

Reply with a single JSON object of exactly this shape:
{{
  "summary": "ticket title (one line)",
  "description": "detailed implementation specification",
  "acceptance_criteria": [
    "acceptance criterion 1",
    "acceptance criterion 2",
    "acceptance criterion 3"
  ],
  "confluence_content": "detailed design document for the wiki"
}}
"#,
        title = issue.title,
        body = issue.body,
    )
}

// ---------------------------------------------------------------------------
// Tracker
// ---------------------------------------------------------------------------

/// Issue type every ticket is filed as.
pub const TICKET_ISSUE_TYPE: &str = "Task";

/// Composes the tracker description: the specification's description, then an
/// acceptance-criteria heading and one `* ` bullet line per criterion.
pub fn render_ticket_description(spec: &SpecificationRecord) -> String {
    let bullets = spec
        .acceptance_criteria
        .iter()
        .map(|criterion| format!("* {criterion}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "{}\n\n*Acceptance criteria:*\n{bullets}",
        spec.description
    )
}

// ---------------------------------------------------------------------------
// Wiki
// ---------------------------------------------------------------------------

/// Page title: the summary, prefixed with `[KEY] ` when a ticket exists.
pub fn render_page_title(spec: &SpecificationRecord, ticket: Option<&TicketReference>) -> String {
    match ticket {
        Some(ticket) => format!("[{}] {}", ticket.key, spec.summary),
        None => spec.summary.clone(),
    }
}

/// Page body as a storage-format HTML fragment.
///
/// Overview heading and paragraph (newlines become `<br/>`), acceptance
/// criteria heading and list, and a related-ticket link only when a ticket
/// exists. All interpolated text is escaped.
pub fn render_page_body(spec: &SpecificationRecord, ticket: Option<&TicketReference>) -> String {
    let overview = escape_html(spec.document_content())
        .replace("\r\n", "<br/>")
        .replace(['\n', '\r'], "<br/>");

    let items: String = spec
        .acceptance_criteria
        .iter()
        .map(|criterion| format!("<li>{}</li>", escape_html(criterion)))
        .collect();

    let mut body = format!(
        "<h2>Overview</h2><p>{overview}</p><h2>Acceptance Criteria</h2><ul>{items}</ul>"
    );

    if let Some(ticket) = ticket {
        let key = escape_html(ticket.key.as_str());
        body.push_str(&format!(
            "<h2>Related Ticket</h2><p>Ticket: <a href=\"{url}\">{key}</a></p>",
            url = escape_html(&ticket.browse_url),
        ));
    }

    body
}

/// Escapes the characters that are significant in HTML text and attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
