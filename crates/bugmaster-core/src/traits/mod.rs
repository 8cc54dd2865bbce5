// SPDX-FileCopyrightText: 2026 BugMaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions.
//!
//! Handlers only see these capability sets; production adapters and test
//! mocks both implement them. All async traits use `#[async_trait]` for
//! dynamic dispatch compatibility.

pub mod adapter;
pub mod bot;
pub mod report;
pub mod storage;

pub use adapter::PluginAdapter;
pub use bot::BotClient;
pub use report::{FailureReport, ReportLoader};
pub use storage::AuditStore;
