//! Run configuration.
//!
//! Configuration is an explicit structure handed to each component at
//! construction; nothing reads the process environment at call time.
//!
//! Tracker and wiki settings arrive as partial records ([`TrackerSettings`],
//! [`WikiSettings`]) because their absence is a supported "feature disabled"
//! state. Resolving a partial record yields either a complete config or a
//! [`MissingConfiguration`] naming every absent field. The model credential
//! is the only value whose absence is fatal.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::{ModelName, ProjectKey, SpaceKey};

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default base URL of the language-model service.
pub const DEFAULT_MODEL_BASE_URL: &str = "https://api.openai.com/v1";

/// Timeout for the model call.
pub const DEFAULT_MODEL_TIMEOUT: Duration = Duration::from_secs(60);

/// Timeout for each of the tracker and wiki calls.
pub const DEFAULT_PUBLISH_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Missing configuration
// ---------------------------------------------------------------------------

/// A component could not be configured because one or more values are absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingConfiguration {
    /// Component the values belong to (`"model"`, `"tracker"`, `"wiki"`).
    pub component: &'static str,
    /// Names of the absent values, in declaration order.
    pub fields: Vec<&'static str>,
}

impl std::fmt::Display for MissingConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} configuration incomplete (missing: {})",
            self.component,
            self.fields.join(", ")
        )
    }
}

impl std::error::Error for MissingConfiguration {}

/// Collects the names of absent values while resolving a partial record.
struct Presence {
    component: &'static str,
    missing: Vec<&'static str>,
}

impl Presence {
    fn new(component: &'static str) -> Self {
        Self {
            component,
            missing: Vec::new(),
        }
    }

    /// Passes `value` through, recording `name` as missing when it is `None`.
    fn require<T>(&mut self, name: &'static str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.missing.push(name);
        }
        value
    }

    fn into_missing(self) -> MissingConfiguration {
        MissingConfiguration {
            component: self.component,
            fields: self.missing,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn non_blank_secret(value: Option<SecretString>) -> Option<SecretString> {
    value.filter(|v| !v.expose_secret().trim().is_empty())
}

fn normalise_url(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

/// Settings for the language-model service.
#[derive(Debug)]
pub struct ModelConfig {
    /// Bearer credential.
    pub credential: SecretString,
    /// Model identifier sent with each request.
    pub model: ModelName,
    /// Service base URL without a trailing slash.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl ModelConfig {
    /// Builds the model configuration, failing if the credential is absent.
    ///
    /// A blank `model` or `base_url` falls back to the defaults.
    pub fn new(
        credential: Option<SecretString>,
        model: Option<String>,
        base_url: Option<String>,
    ) -> Result<Self, MissingConfiguration> {
        let mut presence = Presence::new("model");
        let Some(credential) = presence.require("credential", non_blank_secret(credential)) else {
            return Err(presence.into_missing());
        };

        let model = model.and_then(ModelName::new).unwrap_or_default();
        let base_url = non_blank(base_url).unwrap_or_else(|| DEFAULT_MODEL_BASE_URL.to_string());

        Ok(Self {
            credential,
            model,
            base_url: normalise_url(base_url),
            timeout: DEFAULT_MODEL_TIMEOUT,
        })
    }
}

// ---------------------------------------------------------------------------
// Tracker
// ---------------------------------------------------------------------------

/// Possibly-incomplete tracker settings as read from flags or environment.
#[derive(Debug, Default)]
pub struct TrackerSettings {
    pub base_url: Option<String>,
    pub identity: Option<String>,
    pub credential: Option<SecretString>,
    pub project_key: Option<String>,
}

/// Complete tracker configuration.
#[derive(Debug)]
pub struct TrackerConfig {
    /// Tracker base URL without a trailing slash.
    pub base_url: String,
    /// Account identity used for basic authentication.
    pub identity: String,
    /// Access credential used for basic authentication.
    pub credential: SecretString,
    /// Project new tickets are filed under.
    pub project_key: ProjectKey,
    /// Request timeout.
    pub timeout: Duration,
}

impl TrackerSettings {
    /// Resolves into a complete configuration, or reports every absent value.
    pub fn resolve(self) -> Result<TrackerConfig, MissingConfiguration> {
        let mut presence = Presence::new("tracker");
        let base_url = presence.require("url", non_blank(self.base_url));
        let identity = presence.require("identity", non_blank(self.identity));
        let credential = presence.require("credential", non_blank_secret(self.credential));
        let project_key =
            presence.require("project_key", self.project_key.and_then(ProjectKey::new));

        match (base_url, identity, credential, project_key) {
            (Some(base_url), Some(identity), Some(credential), Some(project_key)) => {
                Ok(TrackerConfig {
                    base_url: normalise_url(base_url),
                    identity,
                    credential,
                    project_key,
                    timeout: DEFAULT_PUBLISH_TIMEOUT,
                })
            }
            _ => Err(presence.into_missing()),
        }
    }
}

// ---------------------------------------------------------------------------
// Wiki
// ---------------------------------------------------------------------------

/// Possibly-incomplete wiki settings as read from flags or environment.
#[derive(Debug, Default)]
pub struct WikiSettings {
    pub base_url: Option<String>,
    pub identity: Option<String>,
    pub credential: Option<SecretString>,
    pub space_key: Option<String>,
}

/// Complete wiki configuration.
#[derive(Debug)]
pub struct WikiConfig {
    /// Wiki base URL without a trailing slash.
    pub base_url: String,
    /// Account identity used for basic authentication.
    pub identity: String,
    /// Access credential used for basic authentication.
    pub credential: SecretString,
    /// Space new pages are created in.
    pub space_key: SpaceKey,
    /// Request timeout.
    pub timeout: Duration,
}

impl WikiSettings {
    /// Resolves into a complete configuration, or reports every absent value.
    pub fn resolve(self) -> Result<WikiConfig, MissingConfiguration> {
        let mut presence = Presence::new("wiki");
        let base_url = presence.require("url", non_blank(self.base_url));
        let identity = presence.require("identity", non_blank(self.identity));
        let credential = presence.require("credential", non_blank_secret(self.credential));
        let space_key = presence.require("space_key", self.space_key.and_then(SpaceKey::new));

        match (base_url, identity, credential, space_key) {
            (Some(base_url), Some(identity), Some(credential), Some(space_key)) => Ok(WikiConfig {
                base_url: normalise_url(base_url),
                identity,
                credential,
                space_key,
                timeout: DEFAULT_PUBLISH_TIMEOUT,
            }),
            _ => Err(presence.into_missing()),
        }
    }
}
