// SPDX-FileCopyrightText: 2026 BugMaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `bugmaster check-config` command implementation.
//!
//! The configuration has already been loaded and validated by the time this
//! runs; the checks here report on what it points at: credentials, the
//! audit database and optionally a channel rule file.

use std::path::Path;
use std::time::{Duration, Instant};

use bugmaster_config::model::BugMasterConfig;
use bugmaster_core::{BugMasterError, HealthStatus, PluginAdapter};
use bugmaster_storage::SqliteStorage;

/// Status of a single check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

impl CheckResult {
    fn new(name: &str, status: CheckStatus, message: impl Into<String>, start: Instant) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: message.into(),
            duration: start.elapsed(),
        }
    }
}

/// Run the `bugmaster check-config` command.
///
/// Fails when any check fails; warnings are printed but tolerated.
pub async fn run_check_config(
    config: &BugMasterConfig,
    channel_file: Option<&Path>,
) -> Result<(), BugMasterError> {
    let mut results = vec![check_slack_credentials(config), check_signing_secret(config)];
    results.push(check_database(config).await);
    if let Some(path) = channel_file {
        results.push(check_channel_file(path));
    }

    println!();
    println!("  bugmaster check-config");
    println!("  {}", "-".repeat(50));

    let mut fail_count = 0;
    let mut warn_count = 0;
    for result in &results {
        let tag = match result.status {
            CheckStatus::Pass => "[OK]  ",
            CheckStatus::Warn => {
                warn_count += 1;
                "[WARN]"
            }
            CheckStatus::Fail => {
                fail_count += 1;
                "[FAIL]"
            }
        };
        println!(
            "    {tag} {:<20} {} ({}ms)",
            result.name,
            result.message,
            result.duration.as_millis()
        );
    }
    println!();
    println!(
        "  {} checks, {warn_count} warning(s), {fail_count} failure(s)",
        results.len()
    );

    if fail_count > 0 {
        return Err(BugMasterError::Config(format!(
            "{fail_count} configuration check(s) failed"
        )));
    }
    Ok(())
}

fn check_slack_credentials(config: &BugMasterConfig) -> CheckResult {
    let start = Instant::now();
    match config.slack.bot_token.as_deref() {
        Some(token) if token.starts_with("xoxb-") => {
            CheckResult::new("slack token", CheckStatus::Pass, "bot token configured", start)
        }
        Some(_) => CheckResult::new(
            "slack token",
            CheckStatus::Warn,
            "bot token does not look like a bot token (xoxb-...)",
            start,
        ),
        None => CheckResult::new(
            "slack token",
            CheckStatus::Fail,
            "slack.bot_token is not set",
            start,
        ),
    }
}

fn check_signing_secret(config: &BugMasterConfig) -> CheckResult {
    let start = Instant::now();
    if config.slack.signing_secret.is_some() {
        CheckResult::new("signing secret", CheckStatus::Pass, "configured", start)
    } else {
        CheckResult::new(
            "signing secret",
            CheckStatus::Warn,
            "not set, inbound requests will not be verified",
            start,
        )
    }
}

async fn check_database(config: &BugMasterConfig) -> CheckResult {
    let start = Instant::now();
    let storage = SqliteStorage::new(config.storage.clone());
    if let Err(e) = storage.initialize().await {
        return CheckResult::new("audit database", CheckStatus::Fail, e.to_string(), start);
    }
    let result = match storage.health_check().await {
        Ok(HealthStatus::Healthy) => CheckResult::new(
            "audit database",
            CheckStatus::Pass,
            format!("{} is reachable", config.storage.database_path),
            start,
        ),
        Ok(HealthStatus::Degraded(reason)) | Ok(HealthStatus::Unhealthy(reason)) => {
            CheckResult::new("audit database", CheckStatus::Fail, reason, start)
        }
        Err(e) => CheckResult::new("audit database", CheckStatus::Fail, e.to_string(), start),
    };
    if let Err(e) = storage.shutdown().await {
        tracing::debug!(error = %e, "audit database shutdown failed");
    }
    result
}

fn check_channel_file(path: &Path) -> CheckResult {
    let start = Instant::now();
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            return CheckResult::new(
                "channel rules",
                CheckStatus::Fail,
                format!("cannot read {}: {e}", path.display()),
                start,
            );
        }
    };
    match bugmaster_config::parse_channel_config(&content) {
        Ok(rules) => CheckResult::new(
            "channel rules",
            CheckStatus::Pass,
            format!("{} action(s)", rules.actions.len()),
            start,
        ),
        Err(e) => CheckResult::new("channel rules", CheckStatus::Fail, e.to_string(), start),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_token_fails() {
        let config = BugMasterConfig::default();
        assert_eq!(check_slack_credentials(&config).status, CheckStatus::Fail);
        assert_eq!(check_signing_secret(&config).status, CheckStatus::Warn);
    }

    #[test]
    fn bot_token_passes() {
        let mut config = BugMasterConfig::default();
        config.slack.bot_token = Some("xoxb-123".to_string());
        assert_eq!(check_slack_credentials(&config).status, CheckStatus::Pass);
    }

    #[tokio::test]
    async fn database_in_temp_dir_passes() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = BugMasterConfig::default();
        config.storage.database_path = dir.path().join("audit.db").to_string_lossy().to_string();
        assert_eq!(check_database(&config).await.status, CheckStatus::Pass);
    }

    #[test]
    fn channel_file_is_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.toml");
        std::fs::write(
            &good,
            "[[actions]]\ndescription = \"metal\"\nemoji = \"metal\"\njob_name = \"e2e-metal\"\n",
        )
        .unwrap();
        let result = check_channel_file(&good);
        assert_eq!(result.status, CheckStatus::Pass, "{}", result.message);
        assert_eq!(result.message, "1 action(s)");

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[[actions]]\nunknown = 1\n").unwrap();
        assert_eq!(check_channel_file(&bad).status, CheckStatus::Fail);

        assert_eq!(
            check_channel_file(&dir.path().join("missing.toml")).status,
            CheckStatus::Fail
        );
    }
}
