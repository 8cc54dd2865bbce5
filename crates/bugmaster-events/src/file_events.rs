// SPDX-FileCopyrightText: 2026 BugMaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Handlers that keep channel configurations in sync with uploaded files.

use async_trait::async_trait;
use bugmaster_core::{BugMasterError, EventData, EventEnvelope, HandlerResponse};
use tracing::{debug, info, warn};

use crate::context::EventContext;
use crate::handler::EventHandler;

/// `message/file_share`: a file was posted to a channel.
pub struct FileShareEvent {
    data: EventData,
}

impl FileShareEvent {
    pub fn new(envelope: &EventEnvelope) -> Self {
        Self {
            data: envelope.data(),
        }
    }
}

#[async_trait]
impl EventHandler for FileShareEvent {
    fn name(&self) -> &'static str {
        "file_share"
    }

    async fn handle(&self, ctx: &EventContext) -> Result<HandlerResponse, BugMasterError> {
        let channel = self.data.channel();
        let file_name = ctx.settings.config_file_name.as_str();
        let shares_configuration = self
            .data
            .files
            .iter()
            .any(|f| f.name.as_deref() == Some(file_name));
        if !shares_configuration {
            debug!(channel, "shared files are not a configuration file");
            return Ok(HandlerResponse::success());
        }

        info!(channel, file = file_name, "configuration file shared, reloading");
        ctx.bot.try_load_configurations_from_history(channel).await;

        let reply = match ctx.bot.get_configuration(channel) {
            Some(configuration) => format!(
                "Configuration file `{file_name}` loaded with {} action(s).",
                configuration.actions.len()
            ),
            None => {
                warn!(channel, "shared configuration file is invalid");
                format!("Configuration file `{file_name}` is invalid and was not applied.")
            }
        };
        ctx.bot
            .add_comment(channel, &reply, self.data.ts.as_deref(), false)
            .await?;
        Ok(HandlerResponse::success())
    }
}

/// `file_change`: a previously shared file was edited.
pub struct FileChangeEvent {
    file_id: Option<String>,
}

impl FileChangeEvent {
    pub fn new(envelope: &EventEnvelope) -> Self {
        Self {
            file_id: envelope.event.as_ref().and_then(|e| e.file_id.clone()),
        }
    }
}

#[async_trait]
impl EventHandler for FileChangeEvent {
    fn name(&self) -> &'static str {
        "file_change"
    }

    async fn handle(&self, ctx: &EventContext) -> Result<HandlerResponse, BugMasterError> {
        let Some(file_id) = self.file_id.as_deref() else {
            debug!("file_change without file id");
            return Ok(HandlerResponse::success());
        };
        match ctx.bot.channel_for_file(file_id) {
            Some(channel) => {
                info!(channel = %channel, file_id, "configuration file changed, reloading");
                ctx.bot.try_load_configurations_from_history(&channel).await;
            }
            None => debug!(file_id, "changed file is not a known configuration file"),
        }
        Ok(HandlerResponse::success())
    }
}
