// system-tests/src/config/suite.rs
// ============================================================================
// Module: Suite Configuration
// Description: Layered configuration for the story spoiler suite.
// Purpose: Merge defaults, an optional TOML file, and env overrides, then validate.
// Dependencies: serde, toml, url, story-spoiler-client
// ============================================================================

//! ## Overview
//! Configuration resolves in layers: built-in defaults, then an optional TOML
//! file, then environment overrides, then validation. Missing or invalid
//! configuration fails closed before any request is sent.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use story_spoiler_client::Credentials;
use story_spoiler_client::StatusCode;
use story_spoiler_client::StoryInput;
use thiserror::Error;
use url::Url;

use super::env::EnvOverrides;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum configuration file size in bytes.
const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://d5wfqm7y6yb3q.cloudfront.net";
/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Default suite account name.
const DEFAULT_USERNAME: &str = "storytester";
/// Default suite account password.
const DEFAULT_PASSWORD: &str = "abc123";
/// Status the current API revision returns for a search with no matches.
const DEFAULT_EMPTY_SEARCH_STATUS: u16 = 404;
/// Statuses observed across API revisions for a search with no matches.
const ALLOWED_EMPTY_SEARCH_STATUSES: [u16; 2] = [404, 400];
/// Default title of the story created by the suite.
const DEFAULT_FIXTURE_TITLE: &str = "Some random title";
/// Default description of the story created by the suite.
const DEFAULT_FIXTURE_DESCRIPTION: &str = "Some description";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Fully resolved suite configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SuiteConfig {
    /// Remote API settings.
    pub api: ApiConfig,
    /// Account used for the session.
    pub credentials: CredentialsConfig,
    /// Expectations that differ between API revisions.
    pub expectations: ExpectationConfig,
    /// Story created by the suite.
    pub fixture: FixtureConfig,
    /// Artifact output settings.
    pub artifacts: ArtifactConfig,
}

/// Remote API settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Account used for the session.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CredentialsConfig {
    /// Account name.
    pub username: String,
    /// Account password.
    pub password: String,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            username: DEFAULT_USERNAME.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
        }
    }
}

impl fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Expectations that differ between API revisions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExpectationConfig {
    /// Status expected for a search with no matches (404 or 400).
    pub empty_search_status: u16,
}

impl Default for ExpectationConfig {
    fn default() -> Self {
        Self {
            empty_search_status: DEFAULT_EMPTY_SEARCH_STATUS,
        }
    }
}

/// Story created and then edited by the suite.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FixtureConfig {
    /// Title of the created story.
    pub title: String,
    /// Description of the created story.
    pub description: String,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_FIXTURE_TITLE.to_string(),
            description: DEFAULT_FIXTURE_DESCRIPTION.to_string(),
        }
    }
}

/// Artifact output settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArtifactConfig {
    /// Directory receiving summaries and transcripts. A timestamped directory
    /// under `target/story-spoiler` is used when unset.
    pub run_root: Option<PathBuf>,
}

// ============================================================================
// SECTION: Loading
// ============================================================================

impl SuiteConfig {
    /// Resolves configuration from defaults, an optional file, and the
    /// environment.
    ///
    /// The file is `path` when given, else `STORY_SPOILER_CONFIG` when set;
    /// otherwise only defaults and environment overrides apply.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed, an
    /// environment value is invalid, or the merged result fails validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_overrides(path, &EnvOverrides::default())
    }

    /// Resolves configuration like [`SuiteConfig::load`], then applies
    /// `overrides` (command-line values) on top of the environment before
    /// validating.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] under the same conditions as
    /// [`SuiteConfig::load`].
    pub fn load_with_overrides(
        path: Option<&Path>,
        overrides: &EnvOverrides,
    ) -> Result<Self, ConfigError> {
        let env = EnvOverrides::load()?;
        let resolved = path.map(Path::to_path_buf).or_else(|| env.config_path.clone());
        let mut config = match resolved {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env(&env);
        config.apply_env(overrides);
        config.validate()?;
        Ok(config)
    }

    /// Parses a TOML file without applying overrides or validation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file is unreadable, too large, not
    /// UTF-8, or not valid suite TOML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let bytes = fs::read(path)
            .map_err(|err| ConfigError::Io(format!("{}: {err}", path.display())))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses TOML content without applying overrides or validation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Applies environment overrides on top of the current values.
    pub fn apply_env(&mut self, overrides: &EnvOverrides) {
        if let Some(base_url) = &overrides.base_url {
            self.api.base_url.clone_from(base_url);
        }
        if let Some(timeout) = overrides.timeout {
            self.api.timeout_secs = timeout.as_secs();
        }
        if let Some(username) = &overrides.username {
            self.credentials.username.clone_from(username);
        }
        if let Some(password) = &overrides.password {
            self.credentials.password.clone_from(password);
        }
        if let Some(status) = overrides.empty_search_status {
            self.expectations.empty_search_status = status;
        }
        if let Some(run_root) = &overrides.run_root {
            self.artifacts.run_root = Some(run_root.clone());
        }
    }

    /// Validates the merged configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.api.base_url).map_err(|err| {
            ConfigError::Invalid(format!("api.base_url is not a valid url: {err}"))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid("api.base_url must use http or https".to_string()));
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "api.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.credentials.username.trim().is_empty() {
            return Err(ConfigError::Invalid("credentials.username must not be empty".to_string()));
        }
        if self.credentials.password.trim().is_empty() {
            return Err(ConfigError::Invalid("credentials.password must not be empty".to_string()));
        }
        if !ALLOWED_EMPTY_SEARCH_STATUSES.contains(&self.expectations.empty_search_status) {
            return Err(ConfigError::Invalid(format!(
                "expectations.empty_search_status must be 404 or 400, got {}",
                self.expectations.empty_search_status
            )));
        }
        if self.fixture.title.trim().is_empty() || self.fixture.description.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "fixture.title and fixture.description must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    /// Returns the session credentials.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.credentials.username, &self.credentials.password)
    }

    /// Returns the status expected for a search with no matches.
    #[must_use]
    pub fn empty_search_status(&self) -> StatusCode {
        StatusCode::from_u16(self.expectations.empty_search_status)
            .unwrap_or(StatusCode::NOT_FOUND)
    }

    /// Returns the story the suite creates.
    #[must_use]
    pub fn fixture_story(&self) -> StoryInput {
        StoryInput::new(&self.fixture.title, &self.fixture.description)
    }
}
