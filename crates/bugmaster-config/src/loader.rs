// SPDX-FileCopyrightText: 2026 BugMaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./bugmaster.toml` > `~/.config/bugmaster/bugmaster.toml` >
//! `/etc/bugmaster/bugmaster.toml` with environment variable overrides via `BUGMASTER_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::BugMasterConfig;

const SYSTEM_CONFIG: &str = "/etc/bugmaster/bugmaster.toml";
const LOCAL_CONFIG: &str = "bugmaster.toml";

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/bugmaster/bugmaster.toml` (system-wide)
/// 3. `~/.config/bugmaster/bugmaster.toml` (user XDG config)
/// 4. `./bugmaster.toml` (local directory)
/// 5. `BUGMASTER_*` environment variables
pub fn load_config() -> Result<BugMasterConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<BugMasterConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BugMasterConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<BugMasterConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BugMasterConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(BugMasterConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG))
        .merge(env_provider())
}

/// `~/.config/bugmaster/bugmaster.toml`, when a config dir exists.
pub(crate) fn user_config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|d| d.join("bugmaster").join(LOCAL_CONFIG))
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` and not `Env::split("_")`: `BUGMASTER_SLACK_BOT_TOKEN` must
/// map to `slack.bot_token`, not `slack.bot.token`.
fn env_provider() -> Env {
    Env::prefixed("BUGMASTER_").map(|key| map_env_key(key.as_str()).into())
}

/// Map a lowercased, prefix-stripped env var name onto a dotted config key.
pub(crate) fn map_env_key(key: &str) -> String {
    const SECTIONS: [&str; 5] = ["bot", "slack", "prow", "storage", "server"];
    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_to_sections() {
        assert_eq!(map_env_key("slack_bot_token"), "slack.bot_token");
        assert_eq!(map_env_key("bot_failure_prefix"), "bot.failure_prefix");
        assert_eq!(map_env_key("server_port"), "server.port");
        assert_eq!(
            map_env_key("prow_request_timeout_secs"),
            "prow.request_timeout_secs"
        );
    }

    #[test]
    fn unknown_env_keys_pass_through() {
        assert_eq!(map_env_key("nothing"), "nothing");
    }
}
