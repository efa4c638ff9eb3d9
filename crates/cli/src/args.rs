//! Command-line and environment configuration surface.
//!
//! Every option has an environment fallback so the binary can run unchanged
//! inside a CI workflow that exports the issue and service settings.

use std::path::PathBuf;

use clap::Parser;
use pipeline::{
    IssueNumber, IssueRequest, MissingConfiguration, ModelConfig, TrackerSettings, WikiSettings,
};
use secrecy::SecretString;

#[derive(Debug, Parser)]
#[command(name = "issue-scribe")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Turn an issue into a tracker ticket and a wiki design page", long_about = None)]
pub struct Cli {
    /// Number of the triggering issue
    #[arg(long, env = "ISSUE_NUMBER")]
    pub issue_number: u64,

    /// Title of the triggering issue
    #[arg(long, env = "ISSUE_TITLE", default_value = "")]
    pub issue_title: String,

    /// Body of the triggering issue
    #[arg(long, env = "ISSUE_BODY", default_value = "")]
    pub issue_body: String,

    /// Directory scanned for source context
    #[arg(long, env = "SOURCE_ROOT", default_value = sources::DEFAULT_SCAN_ROOT)]
    pub source_root: PathBuf,

    /// File extension to collect (repeatable; defaults to common source languages)
    #[arg(long = "extension", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Language-model service credential
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: String,

    /// Model identifier
    #[arg(long, env = "OPENAI_MODEL")]
    pub openai_model: Option<String>,

    /// Language-model service base URL
    #[arg(long, env = "OPENAI_BASE_URL")]
    pub openai_base_url: Option<String>,

    /// Issue tracker base URL
    #[arg(long, env = "JIRA_URL")]
    pub jira_url: Option<String>,

    /// Issue tracker account
    #[arg(long, env = "JIRA_EMAIL")]
    pub jira_email: Option<String>,

    /// Issue tracker access token
    #[arg(long, env = "JIRA_API_TOKEN", hide_env_values = true)]
    pub jira_api_token: Option<String>,

    /// Issue tracker project key
    #[arg(long, env = "JIRA_PROJECT_KEY")]
    pub jira_project_key: Option<String>,

    /// Wiki base URL
    #[arg(long, env = "CONFLUENCE_URL")]
    pub confluence_url: Option<String>,

    /// Wiki account
    #[arg(long, env = "CONFLUENCE_EMAIL")]
    pub confluence_email: Option<String>,

    /// Wiki access token
    #[arg(long, env = "CONFLUENCE_API_TOKEN", hide_env_values = true)]
    pub confluence_api_token: Option<String>,

    /// Wiki space key
    #[arg(long, env = "CONFLUENCE_SPACE_KEY")]
    pub confluence_space_key: Option<String>,

    /// Exit with status 3 when a configured publisher failed
    #[arg(long)]
    pub strict: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    pub log_json: bool,

    /// OTLP collector endpoint for trace export
    #[arg(long, env = "OTEL_EXPORTER_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,
}

fn secret(value: &Option<String>) -> Option<SecretString> {
    value.clone().map(SecretString::from)
}

impl Cli {
    pub fn issue(&self) -> IssueRequest {
        IssueRequest {
            id: IssueNumber::new(self.issue_number),
            title: self.issue_title.clone(),
            body: self.issue_body.clone(),
        }
    }

    pub fn model_config(&self) -> Result<ModelConfig, MissingConfiguration> {
        ModelConfig::new(
            Some(SecretString::from(self.openai_api_key.clone())),
            self.openai_model.clone(),
            self.openai_base_url.clone(),
        )
    }

    pub fn tracker_settings(&self) -> TrackerSettings {
        TrackerSettings {
            base_url: self.jira_url.clone(),
            identity: self.jira_email.clone(),
            credential: secret(&self.jira_api_token),
            project_key: self.jira_project_key.clone(),
        }
    }

    pub fn wiki_settings(&self) -> WikiSettings {
        WikiSettings {
            base_url: self.confluence_url.clone(),
            identity: self.confluence_email.clone(),
            credential: secret(&self.confluence_api_token),
            space_key: self.confluence_space_key.clone(),
        }
    }
}
