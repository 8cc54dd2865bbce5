// SPDX-FileCopyrightText: 2026 BugMaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slack chat adapter for the BugMaster bot.
//!
//! Talks to the Slack Web API over HTTPS with the bot token, caches channel
//! configurations loaded from channel history, and implements
//! [`BotClient`](bugmaster_core::BotClient).

pub mod api;
pub mod bot;

pub use api::SlackApi;
pub use bot::{BotIdentity, SlackBot};
