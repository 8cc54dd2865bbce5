// SPDX-FileCopyrightText: 2026 BugMaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! CI report loader and report traits.

use async_trait::async_trait;

use crate::error::LoadError;
use crate::types::{ChannelConfiguration, FailureActions};

/// Builds a [`FailureReport`] from a report page URL.
#[async_trait]
pub trait ReportLoader: Send + Sync + 'static {
    /// Fetch and parse the report behind `url`.
    ///
    /// Returns [`LoadError::Skip`] when the report is truncated or unparsable
    /// in an expected way and [`LoadError::Fault`] for anything else.
    async fn load(&self, url: &str) -> Result<Box<dyn FailureReport>, LoadError>;
}

/// A loaded CI job failure.
#[async_trait]
pub trait FailureReport: Send + Sync {
    fn build_id(&self) -> &str;

    fn job_name(&self) -> &str;

    /// Canonical report page URL.
    fn url(&self) -> &str;

    /// Reactions and comments the channel's rules produce for this failure.
    async fn get_failure_actions(
        &self,
        channel: &str,
        configuration: &ChannelConfiguration,
    ) -> Result<FailureActions, LoadError>;
}
