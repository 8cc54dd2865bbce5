// SPDX-FileCopyrightText: 2026 BugMaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the BugMaster bot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level BugMaster configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BugMasterConfig {
    /// Bot identity and message filtering.
    #[serde(default)]
    pub bot: BotConfig,

    /// Slack Web API and Events API settings.
    #[serde(default)]
    pub slack: SlackConfig,

    /// Prow report locations and fetch behavior.
    #[serde(default)]
    pub prow: ProwConfig,

    /// Audit storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Webhook HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
}

/// Bot identity and message filtering configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// Display name of the bot, used in log lines and help output.
    #[serde(default = "default_bot_name")]
    pub name: String,

    /// Literal marker a message must start with (whitespace removed) to be
    /// treated as a CI failure notification.
    #[serde(default = "default_failure_prefix")]
    pub failure_prefix: String,

    /// Slash command that addresses the bot.
    #[serde(default = "default_command_prefix")]
    pub command_prefix: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            failure_prefix: default_failure_prefix(),
            command_prefix: default_command_prefix(),
            log_level: default_log_level(),
        }
    }
}

fn default_bot_name() -> String {
    "bugmaster".to_string()
}

fn default_failure_prefix() -> String {
    ":red_jenkins_circle:".to_string()
}

fn default_command_prefix() -> String {
    "/bugmaster".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Slack integration configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SlackConfig {
    /// Bot user OAuth token (`xoxb-...`). `None` disables the Slack client.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Signing secret for verifying inbound requests. `None` skips verification.
    #[serde(default)]
    pub signing_secret: Option<String>,

    /// Base URL of the Slack Web API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// How many history messages to scan when looking for a configuration file.
    #[serde(default = "default_history_limit")]
    pub history_limit: u32,

    /// File name of the per-channel configuration file.
    #[serde(default = "default_config_file_name")]
    pub config_file_name: String,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            signing_secret: None,
            api_base_url: default_api_base_url(),
            history_limit: default_history_limit(),
            config_file_name: default_config_file_name(),
        }
    }
}

fn default_api_base_url() -> String {
    "https://slack.com/api".to_string()
}

fn default_history_limit() -> u32 {
    200
}

fn default_config_file_name() -> String {
    "bug_master_configuration.toml".to_string()
}

/// Prow report configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProwConfig {
    /// Canonical report page prefix; links not starting with it are skipped.
    #[serde(default = "default_main_page_url")]
    pub main_page_url: String,

    /// Artifact storage prefix that mirrors `main_page_url`.
    #[serde(default = "default_base_storage_url")]
    pub base_storage_url: String,

    /// Host marker used to keep plain-text URL matches.
    #[serde(default = "default_link_host")]
    pub link_host: String,

    /// Timeout for a single artifact request, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// How long fetched artifacts stay cached, in seconds.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

impl Default for ProwConfig {
    fn default() -> Self {
        Self {
            main_page_url: default_main_page_url(),
            base_storage_url: default_base_storage_url(),
            link_host: default_link_host(),
            request_timeout_secs: default_request_timeout_secs(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

fn default_main_page_url() -> String {
    "https://prow.ci.openshift.org/view/gs/origin-ci-test/logs".to_string()
}

fn default_base_storage_url() -> String {
    "https://storage.googleapis.com/origin-ci-test/logs/".to_string()
}

fn default_link_host() -> String {
    "prow.ci.openshift.org".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_cache_ttl_secs() -> u64 {
    86_400
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    "bugmaster.db".to_string()
}

fn default_wal_mode() -> bool {
    true
}

/// Webhook server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind the server to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Upper bound on handling one webhook delivery, in seconds.
    #[serde(default = "default_server_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_server_timeout_secs(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_server_timeout_secs() -> u64 {
    120
}
