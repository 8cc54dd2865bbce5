// SPDX-FileCopyrightText: 2026 BugMaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock chat bot for deterministic handler tests.
//!
//! `MockBot` implements `BotClient` with an in-memory configuration cache, a
//! scripted channel "history" that `try_load_configurations_from_history`
//! copies into the cache, and a call log of every outbound reaction and
//! comment for assertions.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use tokio::sync::Mutex;

use bugmaster_core::types::{AdapterType, HealthStatus};
use bugmaster_core::{BotClient, BugMasterError, ChannelConfiguration, PluginAdapter};

pub const MOCK_BOT_ID: &str = "B-BUGMASTER";
pub const MOCK_USER_ID: &str = "U-BUGMASTER";
pub const MOCK_BOT_NAME: &str = "bugmaster";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedComment {
    pub channel: String,
    pub text: String,
    pub thread_ts: Option<String>,
    pub parse: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedReaction {
    pub channel: String,
    pub emoji: String,
    pub ts: String,
}

/// One outbound interaction, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCall {
    HistoryLoad(String),
    Reaction(PostedReaction),
    Comment(PostedComment),
}

/// A mock chat bot.
///
/// Channel history entries are `Some(config)` for a valid configuration file
/// and `None` for an invalid one, which clears any cached configuration on
/// load.
pub struct MockBot {
    configurations: DashMap<String, Arc<ChannelConfiguration>>,
    history: DashMap<String, Option<ChannelConfiguration>>,
    file_channels: DashMap<String, String>,
    channel_names: DashMap<String, String>,
    failing_emojis: DashSet<String>,
    fail_comments: AtomicBool,
    configuration_lookups: AtomicUsize,
    calls: Mutex<Vec<BotCall>>,
}

impl MockBot {
    pub fn new() -> Self {
        Self {
            configurations: DashMap::new(),
            history: DashMap::new(),
            file_channels: DashMap::new(),
            channel_names: DashMap::new(),
            failing_emojis: DashSet::new(),
            fail_comments: AtomicBool::new(false),
            configuration_lookups: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Put a configuration straight into the cache.
    pub fn set_configuration(&self, channel: &str, configuration: ChannelConfiguration) {
        self.configurations
            .insert(channel.to_string(), Arc::new(configuration));
    }

    /// Script the configuration file found in the channel history.
    pub fn set_history(&self, channel: &str, configuration: Option<ChannelConfiguration>) {
        self.history.insert(channel.to_string(), configuration);
    }

    pub fn set_channel_name(&self, channel: &str, name: &str) {
        self.channel_names
            .insert(channel.to_string(), name.to_string());
    }

    /// Register `file_id` as the configuration file of `channel`.
    pub fn set_file_channel(&self, file_id: &str, channel: &str) {
        self.file_channels
            .insert(file_id.to_string(), channel.to_string());
    }

    /// Make `add_reaction` fail for `emoji`.
    pub fn fail_reaction(&self, emoji: &str) {
        self.failing_emojis.insert(emoji.to_string());
    }

    /// Make every `add_comment` call fail.
    pub fn fail_comments(&self) {
        self.fail_comments.store(true, Ordering::SeqCst);
    }

    pub async fn calls(&self) -> Vec<BotCall> {
        self.calls.lock().await.clone()
    }

    pub async fn comments(&self) -> Vec<PostedComment> {
        self.calls
            .lock()
            .await
            .iter()
            .filter_map(|c| match c {
                BotCall::Comment(comment) => Some(comment.clone()),
                _ => None,
            })
            .collect()
    }

    pub async fn reactions(&self) -> Vec<PostedReaction> {
        self.calls
            .lock()
            .await
            .iter()
            .filter_map(|c| match c {
                BotCall::Reaction(reaction) => Some(reaction.clone()),
                _ => None,
            })
            .collect()
    }

    pub async fn history_loads(&self) -> usize {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|c| matches!(c, BotCall::HistoryLoad(_)))
            .count()
    }

    /// Number of `has_channel_configurations` and `get_configuration` calls.
    pub fn configuration_lookups(&self) -> usize {
        self.configuration_lookups.load(Ordering::SeqCst)
    }
}

impl Default for MockBot {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockBot {
    fn name(&self) -> &str {
        "mock-bot"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Chat
    }

    async fn health_check(&self) -> Result<HealthStatus, BugMasterError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), BugMasterError> {
        Ok(())
    }
}

#[async_trait]
impl BotClient for MockBot {
    fn bot_id(&self) -> &str {
        MOCK_BOT_ID
    }

    fn bot_name(&self) -> &str {
        MOCK_BOT_NAME
    }

    fn user_id(&self) -> &str {
        MOCK_USER_ID
    }

    fn has_channel_configurations(&self, channel: &str) -> bool {
        self.configuration_lookups.fetch_add(1, Ordering::SeqCst);
        self.configurations.contains_key(channel)
    }

    async fn try_load_configurations_from_history(&self, channel: &str) {
        self.calls
            .lock()
            .await
            .push(BotCall::HistoryLoad(channel.to_string()));
        let Some(entry) = self.history.get(channel) else {
            return;
        };
        match entry.value() {
            Some(configuration) => {
                self.configurations
                    .insert(channel.to_string(), Arc::new(configuration.clone()));
            }
            None => {
                self.configurations.remove(channel);
            }
        }
    }

    fn get_configuration(&self, channel: &str) -> Option<Arc<ChannelConfiguration>> {
        self.configuration_lookups.fetch_add(1, Ordering::SeqCst);
        self.configurations
            .get(channel)
            .map(|c| Arc::clone(c.value()))
    }

    async fn add_comment(
        &self,
        channel: &str,
        text: &str,
        thread_ts: Option<&str>,
        parse: bool,
    ) -> Result<(), BugMasterError> {
        if self.fail_comments.load(Ordering::SeqCst) {
            return Err(BugMasterError::Chat {
                message: "channel_not_found".to_string(),
                source: None,
            });
        }
        self.calls.lock().await.push(BotCall::Comment(PostedComment {
            channel: channel.to_string(),
            text: text.to_string(),
            thread_ts: thread_ts.map(str::to_string),
            parse,
        }));
        Ok(())
    }

    async fn add_reaction(
        &self,
        channel: &str,
        emoji: &str,
        ts: &str,
    ) -> Result<(), BugMasterError> {
        if self.failing_emojis.contains(emoji) {
            return Err(BugMasterError::Chat {
                message: "invalid_name".to_string(),
                source: None,
            });
        }
        self.calls.lock().await.push(BotCall::Reaction(PostedReaction {
            channel: channel.to_string(),
            emoji: emoji.to_string(),
            ts: ts.to_string(),
        }));
        Ok(())
    }

    async fn channel_name(&self, channel: &str) -> Option<String> {
        self.channel_names.get(channel).map(|n| n.value().clone())
    }

    fn channel_for_file(&self, file_id: &str) -> Option<String> {
        self.file_channels.get(file_id).map(|c| c.value().clone())
    }
}
