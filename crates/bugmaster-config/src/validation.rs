// SPDX-FileCopyrightText: 2026 BugMaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as URL shapes, non-empty markers, and non-zero timeouts.

use crate::diagnostic::ConfigError;
use crate::model::BugMasterConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &BugMasterConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.bot.failure_prefix.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "bot.failure_prefix must not be empty".to_string(),
        });
    }

    if config.bot.failure_prefix.contains(' ') {
        // Messages are compared with spaces removed, so a spaced prefix never matches.
        errors.push(ConfigError::Validation {
            message: format!(
                "bot.failure_prefix `{}` must not contain spaces",
                config.bot.failure_prefix
            ),
        });
    }

    if !config.bot.command_prefix.starts_with('/') {
        errors.push(ConfigError::Validation {
            message: format!(
                "bot.command_prefix `{}` must start with `/`",
                config.bot.command_prefix
            ),
        });
    }

    for (key, value) in [
        ("slack.api_base_url", &config.slack.api_base_url),
        ("prow.main_page_url", &config.prow.main_page_url),
        ("prow.base_storage_url", &config.prow.base_storage_url),
    ] {
        if !is_http_url(value) {
            errors.push(ConfigError::Validation {
                message: format!("{key} must be an http(s) URL, got `{value}`"),
            });
        }
    }

    if let Some(token) = &config.slack.bot_token
        && token.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "slack.bot_token must not be empty when set".to_string(),
        });
    }

    if config.slack.config_file_name.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "slack.config_file_name must not be empty".to_string(),
        });
    }

    if config.slack.history_limit == 0 {
        errors.push(ConfigError::Validation {
            message: "slack.history_limit must be at least 1".to_string(),
        });
    }

    if config.prow.request_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "prow.request_timeout_secs must be at least 1".to_string(),
        });
    }

    if config.server.request_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "server.request_timeout_secs must be at least 1".to_string(),
        });
    }

    if config.server.host.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_http_url(value: &str) -> bool {
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    matches!(rest, Some(host) if !host.is_empty())
}
