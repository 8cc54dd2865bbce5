// SPDX-FileCopyrightText: 2026 BugMaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat platform capability set consumed by event handlers.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::BugMasterError;
use crate::types::ChannelConfiguration;

/// The bot's view of the chat platform.
///
/// Channel configurations are cached by the implementation; the cache must be
/// safe to read and refresh from concurrent event handlers.
#[async_trait]
pub trait BotClient: Send + Sync + 'static {
    /// Bot id as it appears in `bot_id` on messages the bot posted.
    fn bot_id(&self) -> &str;

    /// Display name of the bot.
    fn bot_name(&self) -> &str;

    /// User id of the bot account (seen on `channel_join` events).
    fn user_id(&self) -> &str;

    /// Whether a configuration is cached for `channel`.
    fn has_channel_configurations(&self, channel: &str) -> bool;

    /// Look for a configuration file in the channel history and cache it.
    ///
    /// Failures are logged, never raised: the channel simply stays unconfigured.
    async fn try_load_configurations_from_history(&self, channel: &str);

    /// The cached configuration for `channel`.
    fn get_configuration(&self, channel: &str) -> Option<Arc<ChannelConfiguration>>;

    /// Post `text` to `channel`, threaded under `thread_ts` when given.
    async fn add_comment(
        &self,
        channel: &str,
        text: &str,
        thread_ts: Option<&str>,
        parse: bool,
    ) -> Result<(), BugMasterError>;

    /// React with `emoji` on the message at `ts`.
    async fn add_reaction(&self, channel: &str, emoji: &str, ts: &str)
    -> Result<(), BugMasterError>;

    /// Human-readable channel name, when the platform can resolve it.
    async fn channel_name(&self, _channel: &str) -> Option<String> {
        None
    }

    /// Channel owning a previously loaded configuration file.
    fn channel_for_file(&self, _file_id: &str) -> Option<String> {
        None
    }
}
