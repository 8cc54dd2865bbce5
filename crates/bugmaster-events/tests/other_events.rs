// SPDX-FileCopyrightText: 2026 BugMaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registry dispatch, configuration lifecycle events and slash commands.

use bugmaster_core::types::ActionRule;
use bugmaster_core::{AuditStore, BotClient, BugMasterError, ChannelConfiguration, MessageEventRecord};
use bugmaster_test_utils::mock_bot::MOCK_USER_ID;
use bugmaster_test_utils::{TEST_CHANNEL, TestHarness};
use serde_json::json;

fn configuration(actions: usize) -> ChannelConfiguration {
    ChannelConfiguration {
        disable_auto_assign: false,
        actions: (0..actions)
            .map(|i| ActionRule {
                description: format!("rule {i}"),
                job_name: Some(format!("e2e-{i}")),
                ..Default::default()
            })
            .collect(),
    }
}

#[tokio::test]
async fn url_verification_echoes_challenge() {
    let harness = TestHarness::new().await;
    let response = harness
        .send_event(json!({"type": "url_verification", "challenge": "3eZbrw1aB"}))
        .await
        .unwrap();
    assert_eq!(response.challenge.as_deref(), Some("3eZbrw1aB"));
    assert_eq!(response.code, 200);
}

#[tokio::test]
async fn unsupported_event_is_reported() {
    let harness = TestHarness::new().await;
    let err = harness
        .send_event(json!({
            "type": "event_callback",
            "event": {"type": "reaction_added", "channel": TEST_CHANNEL}
        }))
        .await
        .unwrap_err();
    assert!(matches!(err, BugMasterError::NotSupportedEvent { .. }));
    assert!(harness.bot.calls().await.is_empty());
}

#[tokio::test]
async fn bot_join_without_configuration_posts_hint() {
    let harness = TestHarness::new().await;
    harness
        .send_event(json!({
            "type": "event_callback",
            "event": {"type": "message", "subtype": "channel_join", "user": MOCK_USER_ID, "channel": TEST_CHANNEL}
        }))
        .await
        .unwrap();

    assert_eq!(harness.bot.history_loads().await, 1);
    let comments = harness.bot.comments().await;
    assert_eq!(comments.len(), 1);
    assert!(comments[0].text.contains("bug_master_configuration.toml"));
}

#[tokio::test]
async fn bot_join_with_configuration_stays_quiet() {
    let harness = TestHarness::new().await;
    harness.bot.set_history(TEST_CHANNEL, Some(configuration(1)));
    harness
        .send_event(json!({
            "type": "event_callback",
            "event": {"type": "message", "subtype": "channel_join", "user": MOCK_USER_ID, "channel": TEST_CHANNEL}
        }))
        .await
        .unwrap();
    assert!(harness.bot.comments().await.is_empty());
    assert!(harness.bot.get_configuration(TEST_CHANNEL).is_some());
}

#[tokio::test]
async fn other_user_join_is_ignored() {
    let harness = TestHarness::new().await;
    harness
        .send_event(json!({
            "type": "event_callback",
            "event": {"type": "message", "subtype": "channel_join", "user": "U-SOMEONE", "channel": TEST_CHANNEL}
        }))
        .await
        .unwrap();
    assert!(harness.bot.calls().await.is_empty());
}

fn file_share(name: &str) -> serde_json::Value {
    json!({
        "type": "event_callback",
        "event": {
            "type": "message",
            "subtype": "file_share",
            "channel": TEST_CHANNEL,
            "ts": "5.0",
            "files": [{"id": "F1", "name": name}]
        }
    })
}

#[tokio::test]
async fn shared_configuration_is_loaded_and_confirmed() {
    let harness = TestHarness::new().await;
    harness.bot.set_history(TEST_CHANNEL, Some(configuration(2)));

    harness
        .send_event(file_share("bug_master_configuration.toml"))
        .await
        .unwrap();

    let comments = harness.bot.comments().await;
    assert_eq!(comments.len(), 1);
    assert!(comments[0].text.contains("loaded with 2 action(s)"));
    assert_eq!(comments[0].thread_ts.as_deref(), Some("5.0"));
}

#[tokio::test]
async fn shared_invalid_configuration_is_reported() {
    let harness = TestHarness::new().await;
    harness.bot.set_configuration(TEST_CHANNEL, configuration(1));
    harness.bot.set_history(TEST_CHANNEL, None);

    harness
        .send_event(file_share("bug_master_configuration.toml"))
        .await
        .unwrap();

    let comments = harness.bot.comments().await;
    assert_eq!(comments.len(), 1);
    assert!(comments[0].text.contains("is invalid"));
    assert!(harness.bot.get_configuration(TEST_CHANNEL).is_none());
}

#[tokio::test]
async fn unrelated_file_share_is_ignored() {
    let harness = TestHarness::new().await;
    harness.send_event(file_share("screenshot.png")).await.unwrap();
    assert!(harness.bot.calls().await.is_empty());
}

#[tokio::test]
async fn changed_configuration_file_reloads_owner_channel() {
    let harness = TestHarness::new().await;
    harness.bot.set_file_channel("F1", TEST_CHANNEL);
    harness.bot.set_history(TEST_CHANNEL, Some(configuration(3)));

    harness
        .send_event(json!({"type": "event_callback", "event": {"type": "file_change", "file_id": "F1"}}))
        .await
        .unwrap();
    assert_eq!(harness.bot.history_loads().await, 1);

    harness
        .send_event(json!({"type": "event_callback", "event": {"type": "file_change", "file_id": "F9"}}))
        .await
        .unwrap();
    assert_eq!(harness.bot.history_loads().await, 1);
}

#[tokio::test]
async fn help_lists_every_command() {
    let harness = TestHarness::new().await;
    let reply = harness.send_command("").await.unwrap();
    assert_eq!(reply.response_type, "ephemeral");
    for keyword in ["help", "config", "stats"] {
        assert!(reply.text.contains(&format!("`/bugmaster {keyword}`")), "{keyword}");
    }
}

#[tokio::test]
async fn unknown_command_lists_supported_keywords() {
    let harness = TestHarness::new().await;
    let reply = harness.send_command("deploy").await.unwrap();
    assert!(reply.text.contains("`deploy` is not supported"));
    assert!(reply.text.contains("help, config, stats"));
}

#[tokio::test]
async fn config_command_summarises_rules() {
    let harness = TestHarness::new().await;
    harness.bot.set_history(TEST_CHANNEL, Some(configuration(2)));
    let reply = harness.send_command("config").await.unwrap();
    assert!(reply.text.starts_with("2 action(s):"));
    assert!(reply.text.contains("rule 1"));
}

#[tokio::test]
async fn config_command_without_configuration() {
    let harness = TestHarness::new().await;
    let reply = harness.send_command("config").await.unwrap();
    assert!(reply.text.contains("`ci-alerts` is invalid or missing"));
}

fn record(job_id: &str, job_name: &str, created_at: &str) -> MessageEventRecord {
    MessageEventRecord {
        job_id: job_id.to_string(),
        job_name: job_name.to_string(),
        user: None,
        thread_ts: None,
        url: String::new(),
        channel_id: TEST_CHANNEL.to_string(),
        created_at: created_at.to_string(),
    }
}

#[tokio::test]
async fn stats_counts_recent_records() {
    let harness = TestHarness::new().await;
    harness.store.create(record("1", "e2e-aws", "")).await;
    harness.store.create(record("2", "e2e-aws", "")).await;
    harness.store.create(record("3", "e2e-gcp", "")).await;
    harness
        .store
        .create(record("4", "e2e-old", "2001-01-01T00:00:00.000Z"))
        .await;

    let reply = harness.send_command("stats 7").await.unwrap();
    assert!(reply.text.starts_with("Statistics for the last 1 days:"));
    let aws = reply.text.find("|e2e-aws>").unwrap();
    let gcp = reply.text.find("|e2e-gcp>").unwrap();
    assert!(aws < gcp);
    assert!(!reply.text.contains("e2e-old"));
    assert!(reply.text.ends_with("Total: 3"));
}

#[tokio::test]
async fn stats_without_records() {
    let harness = TestHarness::new().await;
    let reply = harness.send_command("stats").await.unwrap();
    assert_eq!(
        reply.text,
        "There are no records for this channel in the last 1 days."
    );
}

#[tokio::test]
async fn stats_header_reports_span_of_oldest_record() {
    let harness = TestHarness::new().await;
    let two_days_ago = (chrono::Utc::now() - chrono::Duration::days(2))
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string();
    harness.store.create(record("1", "e2e-aws", "")).await;
    harness
        .store
        .create(record("2", "e2e-gcp", &two_days_ago))
        .await;

    let reply = harness.send_command("stats 7").await.unwrap();
    assert!(
        reply.text.starts_with("Statistics for the last 3 days:"),
        "{}",
        reply.text
    );
    assert!(reply.text.ends_with("Total: 2"));
}

#[tokio::test]
async fn stats_rejects_invalid_days() {
    let harness = TestHarness::new().await;
    let reply = harness.send_command("stats -1").await.unwrap();
    assert_eq!(
        reply.text,
        "Invalid number of history days, got `-1`. Positive integer is required."
    );
}
