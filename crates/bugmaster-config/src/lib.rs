// SPDX-FileCopyrightText: 2026 BugMaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the BugMaster bot.
//!
//! Provides TOML configuration parsing with strict validation (`deny_unknown_fields`),
//! XDG file hierarchy lookup, environment variable overrides, miette diagnostics
//! with typo suggestions, and parsing of the per-channel rule files.
//!
//! # Usage
//!
//! ```no_run
//! use bugmaster_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("Failure prefix: {}", config.bot.failure_prefix);
//! ```

pub mod channel;
pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use channel::parse_channel_config;
pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::BugMasterConfig;

/// Load configuration from the XDG hierarchy and validate it.
pub fn load_and_validate() -> Result<BugMasterConfig, Vec<ConfigError>> {
    finish(loader::load_config())
}

/// Load configuration from a specific file (plus env overrides) and validate it.
pub fn load_and_validate_path(path: &std::path::Path) -> Result<BugMasterConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_path(path))
}

/// Load configuration from a TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<BugMasterConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content))
}

#[allow(clippy::result_large_err)]
fn finish(
    loaded: Result<BugMasterConfig, figment::Error>,
) -> Result<BugMasterConfig, Vec<ConfigError>> {
    let config = loaded.map_err(diagnostic::figment_to_config_errors)?;
    validation::validate_config(&config)?;
    tracing::debug!(bot = %config.bot.name, "configuration loaded");
    Ok(config)
}
