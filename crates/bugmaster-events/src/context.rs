// SPDX-FileCopyrightText: 2026 BugMaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborators and settings shared by every handler invocation.

use std::sync::Arc;

use bugmaster_config::model::BugMasterConfig;
use bugmaster_core::{AuditStore, BotClient, ReportLoader};

/// The subset of configuration the handlers read.
#[derive(Debug, Clone)]
pub struct HandlerSettings {
    /// Marker a message must start with (spaces removed) to be processed.
    pub failure_prefix: String,
    /// Canonical report page prefix; other links are skipped.
    pub main_page_url: String,
    /// Host substring used to keep links found in plain text.
    pub link_host: String,
    /// Name of the per-channel configuration file.
    pub config_file_name: String,
    /// Slash command the bot answers to.
    pub command_prefix: String,
}

impl HandlerSettings {
    pub fn from_config(config: &BugMasterConfig) -> Self {
        Self {
            failure_prefix: config.bot.failure_prefix.clone(),
            main_page_url: config.prow.main_page_url.clone(),
            link_host: config.prow.link_host.clone(),
            config_file_name: config.slack.config_file_name.clone(),
            command_prefix: config.bot.command_prefix.clone(),
        }
    }
}

impl Default for HandlerSettings {
    fn default() -> Self {
        Self::from_config(&BugMasterConfig::default())
    }
}

/// Everything a handler may call out to.
#[derive(Clone)]
pub struct EventContext {
    pub bot: Arc<dyn BotClient>,
    pub loader: Arc<dyn ReportLoader>,
    pub store: Arc<dyn AuditStore>,
    pub settings: Arc<HandlerSettings>,
}

impl EventContext {
    pub fn new(
        bot: Arc<dyn BotClient>,
        loader: Arc<dyn ReportLoader>,
        store: Arc<dyn AuditStore>,
        settings: HandlerSettings,
    ) -> Self {
        Self {
            bot,
            loader,
            store,
            settings: Arc::new(settings),
        }
    }
}
