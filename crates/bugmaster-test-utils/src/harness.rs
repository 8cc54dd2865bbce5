// SPDX-FileCopyrightText: 2026 BugMaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for handler integration testing.
//!
//! `TestHarness` assembles an [`EventContext`] from mock collaborators and
//! drives raw webhook payloads and slash commands through the registries,
//! exactly as the gateway does.

use std::sync::Arc;

use bugmaster_config::model::StorageConfig;
use bugmaster_core::types::CommandReply;
use bugmaster_core::{AuditStore, BugMasterError, EventEnvelope, HandlerResponse};
use bugmaster_events::{CommandRequest, EventContext, HandlerSettings};
use bugmaster_storage::SqliteStorage;
use serde_json::{Value, json};

use crate::mock_bot::MockBot;
use crate::mock_loader::MockLoader;
use crate::mock_store::MockStore;

/// Channel used by the payload helpers.
pub const TEST_CHANNEL: &str = "C-CI-ALERTS";

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    settings: HandlerSettings,
    sqlite: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            settings: HandlerSettings::default(),
            sqlite: false,
        }
    }

    pub fn with_settings(mut self, settings: HandlerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Record audit entries in a temporary SQLite database instead of memory.
    pub fn with_sqlite_store(mut self) -> Self {
        self.sqlite = true;
        self
    }

    pub async fn build(self) -> Result<TestHarness, BugMasterError> {
        let bot = Arc::new(MockBot::new());
        let loader = Arc::new(MockLoader::new());
        let mock_store = Arc::new(MockStore::new());

        let mut temp_dir = None;
        let store: Arc<dyn AuditStore> = if self.sqlite {
            let dir =
                tempfile::TempDir::new().map_err(|e| BugMasterError::Storage { source: e.into() })?;
            let storage = SqliteStorage::new(StorageConfig {
                database_path: dir.path().join("audit.db").to_string_lossy().to_string(),
                wal_mode: true,
            });
            storage.initialize().await?;
            temp_dir = Some(dir);
            Arc::new(storage)
        } else {
            mock_store.clone()
        };

        let ctx = EventContext::new(bot.clone(), loader.clone(), store.clone(), self.settings);
        Ok(TestHarness {
            bot,
            loader,
            mock_store,
            store,
            ctx,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete handler environment with mock collaborators.
pub struct TestHarness {
    pub bot: Arc<MockBot>,
    pub loader: Arc<MockLoader>,
    /// In-memory store; unused when the harness was built with SQLite.
    pub mock_store: Arc<MockStore>,
    /// The store wired into the context.
    pub store: Arc<dyn AuditStore>,
    pub ctx: EventContext,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: Option<tempfile::TempDir>,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Harness with default settings and the in-memory store.
    pub async fn new() -> Self {
        match Self::builder().build().await {
            Ok(harness) => harness,
            Err(e) => panic!("failed to build test harness: {e}"),
        }
    }

    /// Deliver a raw webhook payload through the event registry.
    pub async fn send_event(&self, payload: Value) -> Result<HandlerResponse, BugMasterError> {
        let envelope: EventEnvelope = serde_json::from_value(payload)
            .map_err(|e| BugMasterError::Internal(format!("invalid test payload: {e}")))?;
        bugmaster_events::dispatch_event(&self.ctx, &envelope).await
    }

    /// Run `/bugmaster <text>` in [`TEST_CHANNEL`].
    pub async fn send_command(&self, text: &str) -> Result<CommandReply, BugMasterError> {
        let request = CommandRequest {
            command: self.ctx.settings.command_prefix.clone(),
            text: text.to_string(),
            channel_id: TEST_CHANNEL.to_string(),
            channel_name: Some("ci-alerts".to_string()),
            user_id: "U-DEV".to_string(),
            ..Default::default()
        };
        bugmaster_events::dispatch_command(&self.ctx, &request).await
    }

    /// Report page URL for `build_id` under the configured report host.
    pub fn report_url(&self, build_id: &str) -> String {
        format!(
            "{}/periodic-ci-org-repo-main-e2e/{build_id}",
            self.ctx.settings.main_page_url.trim_end_matches('/')
        )
    }

    /// A failure notification in [`TEST_CHANNEL`] linking `links` as rich-text blocks.
    pub fn failure_message(&self, ts: &str, links: &[String]) -> Value {
        let elements: Vec<Value> = links
            .iter()
            .map(|url| json!({"type": "link", "url": url}))
            .collect();
        json!({
            "type": "event_callback",
            "event_id": format!("Ev{ts}"),
            "event": {
                "type": "message",
                "user": "U-CI",
                "channel": TEST_CHANNEL,
                "ts": ts,
                "text": format!("{} Job failed", self.ctx.settings.failure_prefix),
                "blocks": [{
                    "type": "rich_text",
                    "elements": [{"type": "rich_text_section", "elements": elements}]
                }]
            }
        })
    }
}
