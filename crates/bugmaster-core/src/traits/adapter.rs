// SPDX-FileCopyrightText: 2026 BugMaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base adapter trait for long-lived collaborators.

use async_trait::async_trait;

use crate::error::BugMasterError;
use crate::types::{AdapterType, HealthStatus};

/// Identity, health, and lifecycle shared by the storage, chat, and report adapters.
#[async_trait]
pub trait PluginAdapter: Send + Sync + 'static {
    /// Returns the adapter name (e.g. `sqlite`, `slack`).
    fn name(&self) -> &str;

    /// Returns the semantic version of this adapter.
    fn version(&self) -> semver::Version;

    /// Returns the kind of adapter.
    fn adapter_type(&self) -> AdapterType;

    /// Performs a health check and returns the adapter's current status.
    async fn health_check(&self) -> Result<HealthStatus, BugMasterError>;

    /// Gracefully shuts down the adapter, releasing any held resources.
    async fn shutdown(&self) -> Result<(), BugMasterError>;
}
