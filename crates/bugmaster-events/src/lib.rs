// SPDX-FileCopyrightText: 2026 BugMaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slack event and slash command handlers for BugMaster.
//!
//! Each webhook delivery is resolved through a static registry keyed by the
//! event's `(type, subtype)` pair and handled against an [`EventContext`]
//! holding the bot client, report loader and audit store. The central
//! handler, [`MessageChannelEvent`], reacts to CI failure notifications:
//! it resolves the channel's rules, loads each linked report, posts
//! reactions and ordered comments, and records one audit entry per link.

pub mod channel_join;
pub mod commands;
pub mod context;
pub mod file_events;
pub mod handler;
pub mod links;
pub mod message;
pub mod registry;
pub mod url_verification;

pub use commands::{CommandRequest, dispatch_command, get_command, supported_commands};
pub use context::{EventContext, HandlerSettings};
pub use handler::EventHandler;
pub use links::extract_links;
pub use message::MessageChannelEvent;
pub use registry::{dispatch_event, get_event_handler, supported_events};
