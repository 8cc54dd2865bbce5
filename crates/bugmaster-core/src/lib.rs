// SPDX-FileCopyrightText: 2026 BugMaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the BugMaster CI failure bot.
//!
//! This crate provides the error types, webhook payload types, and the
//! collaborator traits (chat client, report loader, audit store) that the
//! event handlers are written against.

pub mod error;
pub mod event;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{BugMasterError, LoadError};
pub use event::{EventData, EventEnvelope, SharedFile};
pub use types::{
    AdapterType, ChannelConfiguration, Comment, CommentType, FailureActions, HandlerResponse,
    HealthStatus, MessageEventRecord, Upsert,
};

pub use traits::{AuditStore, BotClient, FailureReport, PluginAdapter, ReportLoader};
