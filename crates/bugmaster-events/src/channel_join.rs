// SPDX-FileCopyrightText: 2026 BugMaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Handler for `message/channel_join`: the bot was added to a channel.

use async_trait::async_trait;
use bugmaster_core::{BugMasterError, EventData, EventEnvelope, HandlerResponse};
use tracing::{debug, info};

use crate::context::EventContext;
use crate::handler::EventHandler;

/// Hint posted when the bot joins a channel without a configuration file.
pub fn setup_hint_text(bot_name: &str, config_file_name: &str) -> String {
    format!(
        "Hi, I'm {bot_name}. I could not find a `{config_file_name}` file in this channel. \
         Upload one to tell me how to triage CI failures here."
    )
}

pub struct ChannelJoinEvent {
    data: EventData,
}

impl ChannelJoinEvent {
    pub fn new(envelope: &EventEnvelope) -> Self {
        Self {
            data: envelope.data(),
        }
    }
}

#[async_trait]
impl EventHandler for ChannelJoinEvent {
    fn name(&self) -> &'static str {
        "channel_join"
    }

    async fn handle(&self, ctx: &EventContext) -> Result<HandlerResponse, BugMasterError> {
        let channel = self.data.channel();
        if self.data.user.as_deref() != Some(ctx.bot.user_id()) {
            debug!(channel, user = ?self.data.user, "another user joined the channel");
            return Ok(HandlerResponse::success());
        }

        info!(channel, "bot joined channel, loading configuration");
        ctx.bot.try_load_configurations_from_history(channel).await;
        if ctx.bot.has_channel_configurations(channel) {
            return Ok(HandlerResponse::success());
        }

        ctx.bot
            .add_comment(
                channel,
                &setup_hint_text(ctx.bot.bot_name(), &ctx.settings.config_file_name),
                None,
                false,
            )
            .await?;
        Ok(HandlerResponse::success())
    }
}
