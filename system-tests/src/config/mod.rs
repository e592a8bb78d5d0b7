// system-tests/src/config/mod.rs
// ============================================================================
// Module: Suite Configuration
// Description: Centralized configuration for the story spoiler suite.
// Purpose: Provide typed access to API settings, credentials, and expectations.
// Dependencies: serde, toml, url
// ============================================================================

//! ## Overview
//! Suite configuration is read from an optional TOML file and environment
//! variables and mapped into a small typed structure shared by the runner
//! binary and the test suites.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod env;
mod suite;

// ============================================================================
// SECTION: Tests
// ============================================================================


// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use env::EnvOverrides;
pub use env::SuiteEnv;
pub use env::read_env_strict;
pub use suite::ApiConfig;
pub use suite::ArtifactConfig;
pub use suite::ConfigError;
pub use suite::CredentialsConfig;
pub use suite::DEFAULT_BASE_URL;
pub use suite::ExpectationConfig;
pub use suite::FixtureConfig;
pub use suite::SuiteConfig;
