// system-tests/src/config/env.rs
// ============================================================================
// Module: Suite Environment
// Description: Environment-backed overrides for the story spoiler suite.
// Purpose: Centralize env parsing with strict UTF-8 validation.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Environment values are parsed with strict UTF-8 enforcement to avoid silent
//! misconfiguration. Invalid UTF-8 and set-but-blank values fail closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use super::suite::ConfigError;

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Environment keys for suite configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuiteEnv {
    /// Optional TOML config file path.
    ConfigPath,
    /// Optional API base URL override.
    BaseUrl,
    /// Optional username override.
    Username,
    /// Optional password override.
    Password,
    /// Optional request timeout override in seconds (positive integer).
    TimeoutSeconds,
    /// Optional expected status for a search with no matches (404 or 400).
    EmptySearchStatus,
    /// Optional artifact run root override.
    RunRoot,
    /// Optional log level for the runner binary.
    LogLevel,
}

impl SuiteEnv {
    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ConfigPath => "STORY_SPOILER_CONFIG",
            Self::BaseUrl => "STORY_SPOILER_BASE_URL",
            Self::Username => "STORY_SPOILER_USERNAME",
            Self::Password => "STORY_SPOILER_PASSWORD",
            Self::TimeoutSeconds => "STORY_SPOILER_TIMEOUT_SEC",
            Self::EmptySearchStatus => "STORY_SPOILER_EMPTY_SEARCH_STATUS",
            Self::RunRoot => "STORY_SPOILER_RUN_ROOT",
            Self::LogLevel => "STORY_SPOILER_LOG",
        }
    }
}

// ============================================================================
// SECTION: Override Types
// ============================================================================

/// Typed overrides read from environment variables. `None` leaves the file or
/// default value in place.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct EnvOverrides {
    /// Config file path.
    pub config_path: Option<PathBuf>,
    /// API base URL.
    pub base_url: Option<String>,
    /// Account username.
    pub username: Option<String>,
    /// Account password.
    pub password: Option<String>,
    /// Request timeout.
    pub timeout: Option<Duration>,
    /// Expected empty-search status code.
    pub empty_search_status: Option<u16>,
    /// Artifact run root.
    pub run_root: Option<PathBuf>,
}

impl fmt::Debug for EnvOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvOverrides")
            .field("config_path", &self.config_path)
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("empty_search_status", &self.empty_search_status)
            .field("run_root", &self.run_root)
            .finish()
    }
}

impl EnvOverrides {
    /// Loads overrides from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a value is not valid UTF-8, is
    /// blank, or fails validation (for example, a zero timeout).
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = read_env_nonempty(SuiteEnv::ConfigPath.as_str())?.map(PathBuf::from);
        let base_url = read_env_nonempty(SuiteEnv::BaseUrl.as_str())?;
        let username = read_env_nonempty(SuiteEnv::Username.as_str())?;
        let password = read_env_nonempty(SuiteEnv::Password.as_str())?;
        let timeout = read_env_nonempty(SuiteEnv::TimeoutSeconds.as_str())?
            .map(|value| parse_timeout_seconds(SuiteEnv::TimeoutSeconds.as_str(), &value))
            .transpose()?;
        let empty_search_status = read_env_nonempty(SuiteEnv::EmptySearchStatus.as_str())?
            .map(|value| parse_status_code(SuiteEnv::EmptySearchStatus.as_str(), &value))
            .transpose()?;
        let run_root = read_env_nonempty(SuiteEnv::RunRoot.as_str())?.map(PathBuf::from);
        Ok(Self {
            config_path,
            base_url,
            username,
            password,
            timeout,
            empty_search_status,
            run_root,
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads an environment variable and enforces UTF-8 validity.
///
/// # Errors
///
/// Returns an error when the environment variable contains invalid UTF-8.
pub fn read_env_strict(name: &str) -> Result<Option<String>, ConfigError> {
    std::env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(format!("{name} must be valid UTF-8")))
    })
}

/// Reads an environment variable and rejects empty values.
fn read_env_nonempty(name: &str) -> Result<Option<String>, ConfigError> {
    match read_env_strict(name)? {
        Some(value) if value.trim().is_empty() => {
            Err(ConfigError::Invalid(format!("{name} must not be empty")))
        }
        Some(value) => Ok(Some(value)),
        None => Ok(None),
    }
}

/// Parses a positive timeout value from an environment variable string.
fn parse_timeout_seconds(name: &str, raw: &str) -> Result<Duration, ConfigError> {
    let secs: u64 = raw.trim().parse().map_err(|_| {
        ConfigError::Invalid(format!("{name} must be a positive integer number of seconds"))
    })?;
    if secs == 0 {
        return Err(ConfigError::Invalid(format!("{name} must be greater than zero")));
    }
    Ok(Duration::from_secs(secs))
}

/// Parses an HTTP status code; range checks happen in config validation.
fn parse_status_code(name: &str, raw: &str) -> Result<u16, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::Invalid(format!("{name} must be an HTTP status code")))
}
