//! Human-readable console progress.

use std::io::Write;
use std::sync::Mutex;

use pipeline::{RunEvent, RunObserver, RunReport, Stage};

/// Number of working stages shown in progress lines.
const STAGE_COUNT: u8 = 4;

/// Prints one progress line per [`RunEvent`] to a writer (stdout in the binary).
pub struct ConsoleReporter<W> {
    out: Mutex<W>,
}

impl<W: Write + Send> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }
}

impl<W: Write + Send> RunObserver for ConsoleReporter<W> {
    fn on_event(&self, event: &RunEvent) {
        let Some(line) = render_event(event) else {
            return;
        };
        if let Ok(mut out) = self.out.lock() {
            let _ = writeln!(out, "{line}");
        }
    }
}

/// The progress line for `event`, or `None` if the event is not shown.
pub fn render_event(event: &RunEvent) -> Option<String> {
    let line = match event {
        RunEvent::StageStarted(Stage::Done) => "\n=== Done ===".to_string(),
        RunEvent::StageStarted(stage) => {
            let n = stage.ordinal().unwrap_or(STAGE_COUNT);
            format!("\n[{n}/{STAGE_COUNT}] {stage}...")
        }
        RunEvent::ContextCollected { files } => format!("  ✓ {files} files read"),
        RunEvent::SpecificationGenerated { summary } => {
            format!("  ✓ specification generated: {summary}")
        }
        RunEvent::GenerationFailed { message } => format!("  ✗ error: {message}"),
        RunEvent::TicketPublished { key } => format!("  ✓ ticket created: {key}"),
        RunEvent::TicketSkipped { reason } => format!("  ! ticket skipped: {reason}"),
        RunEvent::TicketFailed { message } => format!("  ✗ ticket creation failed: {message}"),
        RunEvent::PagePublished { id, .. } => format!("  ✓ page created: {id}"),
        RunEvent::PageSkipped { reason } => format!("  ! page skipped: {reason}"),
        RunEvent::PageFailed { message } => format!("  ✗ page creation failed: {message}"),
        RunEvent::Finished => return None,
    };
    Some(line)
}

/// Closing summary lines for a completed run.
pub fn render_summary(report: &RunReport) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(ticket) = report.ticket.reference() {
        lines.push(format!("Ticket: {} ({})", ticket.key, ticket.browse_url));
    }
    if let Some(page) = report.page.reference() {
        lines.push(format!("Page: {} \"{}\"", page.id, page.title));
    }
    lines
}
