// SPDX-FileCopyrightText: 2026 BugMaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway receiving Slack Events API deliveries and slash commands.
//!
//! Requests are verified against the Slack signing secret, dispatched
//! through the event and command registries, and acknowledged with the
//! handler's `{msg, Code}` response.

pub mod auth;
pub mod handlers;
pub mod server;

pub use auth::AuthConfig;
pub use server::{GatewayState, ServerConfig, router, start_server};
