// SPDX-FileCopyrightText: 2026 BugMaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for BugMaster integration tests.
//!
//! Provides mock collaborators and a test harness for fast, deterministic,
//! CI-runnable handler tests without Slack, Prow or a database server.
//!
//! # Components
//!
//! - [`MockBot`] - Mock chat bot with scripted channel history and a call log
//! - [`MockLoader`] / [`MockReport`] - Scripted report loading and evaluation
//! - [`MockStore`] - In-memory audit store
//! - [`TestHarness`] - Wires the mocks into an `EventContext`

pub mod harness;
pub mod mock_bot;
pub mod mock_loader;
pub mod mock_store;

pub use harness::{TEST_CHANNEL, TestHarness};
pub use mock_bot::{BotCall, MockBot, PostedComment, PostedReaction};
pub use mock_loader::{MockLoader, MockReport, ScriptedActions, ScriptedLoad};
pub use mock_store::MockStore;
