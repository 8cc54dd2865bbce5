// SPDX-FileCopyrightText: 2026 BugMaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prow CI report source for the BugMaster bot.
//!
//! Maps report page links onto the job's artifact bucket, parses
//! `prowjob.json` into a [`ProwResource`], and evaluates channel rules
//! against the job's artifacts.

pub mod cache;
pub mod client;
pub mod failure;
pub mod loader;
pub mod resource;

pub use failure::ProwJobFailure;
pub use loader::ProwLoader;
pub use resource::ProwResource;
