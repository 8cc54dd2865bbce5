// SPDX-FileCopyrightText: 2026 BugMaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slack implementation of the BotClient trait.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::{debug, info, warn};

use bugmaster_config::channel::parse_channel_config;
use bugmaster_config::model::SlackConfig;
use bugmaster_core::{
    AdapterType, BotClient, BugMasterError, ChannelConfiguration, HealthStatus, PluginAdapter,
    SharedFile,
};

use crate::api::{AuthTest, ChannelInfo, History, SlackApi, slack_error_code};

/// Reaction errors that mean the reaction is already in place.
const BENIGN_REACTION_ERRORS: &[&str] = &["already_reacted"];

/// Identity of the bot account, resolved by `auth.test`.
#[derive(Debug, Clone, Default)]
pub struct BotIdentity {
    pub bot_id: String,
    pub user_id: String,
    pub name: String,
}

/// Slack bot client with a per-channel configuration cache.
pub struct SlackBot {
    api: SlackApi,
    config: SlackConfig,
    identity: BotIdentity,
    configurations: DashMap<String, Arc<ChannelConfiguration>>,
    /// Configuration file id -> channel that published it.
    file_channels: DashMap<String, String>,
    channel_names: DashMap<String, String>,
}

impl SlackBot {
    /// Build the client and resolve the bot identity with `auth.test`.
    pub async fn connect(config: SlackConfig) -> Result<Self, BugMasterError> {
        let token = config
            .bot_token
            .as_deref()
            .ok_or_else(|| BugMasterError::Config("slack.bot_token is not set".into()))?;
        let api = SlackApi::new(token, &config.api_base_url)?;

        let auth: AuthTest = api.post("auth.test", &serde_json::json!({})).await?;
        let identity = BotIdentity {
            bot_id: auth.bot_id.unwrap_or_default(),
            user_id: auth.user_id,
            name: auth.user.unwrap_or_else(|| "bugmaster".to_string()),
        };
        info!(
            bot_id = %identity.bot_id,
            user_id = %identity.user_id,
            name = %identity.name,
            "connected to slack"
        );

        Ok(Self {
            api,
            config,
            identity,
            configurations: DashMap::new(),
            file_channels: DashMap::new(),
            channel_names: DashMap::new(),
        })
    }

    pub fn identity(&self) -> &BotIdentity {
        &self.identity
    }

    /// Newest configuration file in the channel history, if any.
    async fn find_configuration_file(
        &self,
        channel: &str,
    ) -> Result<Option<SharedFile>, BugMasterError> {
        let limit = self.config.history_limit.to_string();
        let history: History = self
            .api
            .get(
                "conversations.history",
                &[("channel", channel), ("limit", limit.as_str())],
            )
            .await?;

        Ok(history
            .messages
            .into_iter()
            .flat_map(|m| m.files)
            .find(|f| f.name.as_deref() == Some(self.config.config_file_name.as_str())))
    }

    async fn load_configuration(&self, channel: &str) -> Result<bool, BugMasterError> {
        let Some(file) = self.find_configuration_file(channel).await? else {
            debug!(channel, "no configuration file in channel history");
            return Ok(false);
        };
        let Some(url) = file.url_private_download.as_deref() else {
            warn!(channel, file_id = %file.id, "configuration file has no download url");
            return Ok(false);
        };

        let content = self.api.download(url).await?;
        self.file_channels.insert(file.id.clone(), channel.to_string());
        match parse_channel_config(&content) {
            Ok(parsed) => {
                info!(
                    channel,
                    file_id = %file.id,
                    actions = parsed.actions.len(),
                    "channel configuration loaded"
                );
                self.configurations.insert(channel.to_string(), Arc::new(parsed));
                Ok(true)
            }
            Err(e) => {
                warn!(channel, file_id = %file.id, error = %e, "invalid channel configuration");
                self.configurations.remove(channel);
                Ok(false)
            }
        }
    }
}

#[async_trait]
impl BotClient for SlackBot {
    fn bot_id(&self) -> &str {
        &self.identity.bot_id
    }

    fn bot_name(&self) -> &str {
        &self.identity.name
    }

    fn user_id(&self) -> &str {
        &self.identity.user_id
    }

    fn has_channel_configurations(&self, channel: &str) -> bool {
        self.configurations.contains_key(channel)
    }

    async fn try_load_configurations_from_history(&self, channel: &str) {
        if let Err(e) = self.load_configuration(channel).await {
            warn!(channel, error = %e, "failed to load channel configuration");
        }
    }

    fn get_configuration(&self, channel: &str) -> Option<Arc<ChannelConfiguration>> {
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
        let mut body = serde_json::json!({
            "channel": channel,
            "text": text,
            "parse": if parse { "full" } else { "none" },
        });
        if let Some(ts) = thread_ts {
            body["thread_ts"] = serde_json::Value::String(ts.to_string());
        }
        let _: serde_json::Value = self.api.post("chat.postMessage", &body).await?;
        debug!(channel, thread_ts = ?thread_ts, "comment posted");
        Ok(())
    }

    async fn add_reaction(
        &self,
        channel: &str,
        emoji: &str,
        ts: &str,
    ) -> Result<(), BugMasterError> {
        let body = serde_json::json!({
            "channel": channel,
            "name": emoji.trim_matches(':'),
            "timestamp": ts,
        });
        match self
            .api
            .post::<serde_json::Value>("reactions.add", &body)
            .await
        {
            Ok(_) => Ok(()),
            Err(e)
                if slack_error_code(&e)
                    .is_some_and(|code| BENIGN_REACTION_ERRORS.contains(&code)) =>
            {
                debug!(channel, emoji, "reaction already present");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn channel_name(&self, channel: &str) -> Option<String> {
        if let Some(name) = self.channel_names.get(channel) {
            return Some(name.value().clone());
        }
        match self
            .api
            .get::<ChannelInfo>("conversations.info", &[("channel", channel)])
            .await
        {
            Ok(info) => {
                let name = info.channel.name?;
                self.channel_names.insert(info.channel.id, name.clone());
                Some(name)
            }
            Err(e) => {
                debug!(channel, error = %e, "channel name lookup failed");
                None
            }
        }
    }

    fn channel_for_file(&self, file_id: &str) -> Option<String> {
        self.file_channels.get(file_id).map(|c| c.value().clone())
    }
}

#[async_trait]
impl PluginAdapter for SlackBot {
    fn name(&self) -> &str {
        "slack"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Chat
    }

    async fn health_check(&self) -> Result<HealthStatus, BugMasterError> {
        match self
            .api
            .post::<AuthTest>("auth.test", &serde_json::json!({}))
            .await
        {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Degraded(e.to_string())),
        }
    }

    async fn shutdown(&self) -> Result<(), BugMasterError> {
        Ok(())
    }
}
