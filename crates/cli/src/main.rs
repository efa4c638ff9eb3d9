//! issue-scribe CLI entry point.
//!
//! This binary is the composition root for the entire system. Responsibilities:
//!
//! 1. **Parse configuration** — flags with environment fallbacks ([`args`]).
//! 2. **Wire observability** — `tracing-subscriber` to stderr, with optional
//!    OpenTelemetry OTLP export ([`telemetry`]).
//! 3. **Construct infrastructure** — the filesystem context source, the model
//!    provider, and the tracker and wiki clients (or their disabled
//!    placeholders), injected into [`nodes::PipelineExecutor`].
//! 4. **Run once and report** — progress lines on stdout ([`report`]) and the
//!    process exit status.
//!
//! ## Exit status
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Run completed (publishing stages may have been skipped or failed) |
//! | 1 | Specification generation failed, or startup configuration is invalid (e.g. a blank model credential) |
//! | 2 | Invalid command line, including a missing model credential |
//! | 3 | `--strict` and a configured publisher failed |

mod args;
mod report;
mod telemetry;

use std::process::ExitCode;

use anyhow::{Context, Result};
use atlassian::{ConfluenceClient, JiraClient};
use clap::Parser;
use llm::OpenAiProvider;
use nodes::PipelineExecutor;
use pipeline::{DocumentWiki, PipelineError, Publisher, RunReport, TicketTracker};
use sources::FilesystemContextSource;
use tracing::{error, info};

use crate::args::Cli;
use crate::report::{render_summary, ConsoleReporter};

const EXIT_PUBLISH_FAILED: u8 = 3;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let telemetry = match telemetry::init(cli.log_json, cli.otlp_endpoint.as_deref()) {
        Ok(telemetry) => telemetry,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!(error = %format!("{e:#}"), "run aborted");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    };

    telemetry.shutdown();
    code
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let model_config = cli.model_config().map_err(PipelineError::Configuration)?;
    let model = OpenAiProvider::new(model_config).context("failed to construct model provider")?;

    let tracker: Publisher<dyn TicketTracker> = match cli.tracker_settings().resolve() {
        Ok(config) => Publisher::Enabled(Box::new(
            JiraClient::new(config).context("failed to construct tracker client")?,
        )),
        Err(missing) => Publisher::Disabled(missing),
    };

    let wiki: Publisher<dyn DocumentWiki> = match cli.wiki_settings().resolve() {
        Ok(config) => Publisher::Enabled(Box::new(
            ConfluenceClient::new(config).context("failed to construct wiki client")?,
        )),
        Err(missing) => Publisher::Disabled(missing),
    };

    let mut context = FilesystemContextSource::new(&cli.source_root);
    if !cli.extensions.is_empty() {
        context = context.with_extensions(&cli.extensions);
    }

    let executor = PipelineExecutor::new(Box::new(context), Box::new(model), tracker, wiki)
        .with_observer(Box::new(ConsoleReporter::new(std::io::stdout())));

    let issue = cli.issue();
    println!("=== Processing issue ===");
    println!("Issue {}: {}", issue.id, issue.title);

    let result = executor.run(&issue).await;
    match &result {
        Ok(report) => {
            for line in render_summary(report) {
                println!("{line}");
            }
            info!(
                run_id = %report.run_id,
                started_at = %report.started_at,
                finished_at = %report.finished_at,
                "run complete"
            );
        }
        Err(e) => error!(error = %e, "run failed"),
    }

    Ok(exit_code(&result, cli.strict))
}

/// Maps the outcome of a run onto the process exit status.
fn exit_code(result: &Result<RunReport, PipelineError>, strict: bool) -> ExitCode {
    match result {
        Err(_) => ExitCode::FAILURE,
        Ok(report) if strict && report.has_publish_failure() => {
            ExitCode::from(EXIT_PUBLISH_FAILED)
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}
