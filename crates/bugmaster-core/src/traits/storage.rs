// SPDX-FileCopyrightText: 2026 BugMaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Audit record store trait.

use async_trait::async_trait;

use crate::error::BugMasterError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{MessageEventRecord, Upsert};

/// Upsert-by-id store for processed failure links.
#[async_trait]
pub trait AuditStore: PluginAdapter {
    /// Create the record, or return the existing one with the same `job_id`.
    ///
    /// Must be idempotent under concurrent calls for the same id. Database
    /// errors are logged and reported as [`Upsert::NotCreated`].
    async fn create(&self, record: MessageEventRecord) -> Upsert<MessageEventRecord>;

    /// Records for `channel` created at or after `since` (ISO 8601), oldest first.
    async fn select(
        &self,
        channel: &str,
        since: &str,
    ) -> Result<Vec<MessageEventRecord>, BugMasterError>;
}
