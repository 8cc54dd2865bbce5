// SPDX-FileCopyrightText: 2026 BugMaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory audit store with the same create-or-fetch semantics as SQLite.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use bugmaster_core::types::{AdapterType, HealthStatus};
use bugmaster_core::{AuditStore, BugMasterError, MessageEventRecord, PluginAdapter, Upsert};

pub struct MockStore {
    records: DashMap<String, MessageEventRecord>,
    failing: AtomicBool,
    creates: AtomicUsize,
}

impl MockStore {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            failing: AtomicBool::new(false),
            creates: AtomicUsize::new(0),
        }
    }

    /// Make every `create` return `NotCreated`.
    pub fn fail_writes(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    /// Number of `create` calls, successful or not.
    pub fn create_calls(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    /// Stored records, oldest first.
    pub fn records(&self) -> Vec<MessageEventRecord> {
        let mut records: Vec<MessageEventRecord> =
            self.records.iter().map(|r| r.value().clone()).collect();
        records.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.job_id.cmp(&b.job_id))
        });
        records
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockStore {
    fn name(&self) -> &str {
        "mock-store"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, BugMasterError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), BugMasterError> {
        Ok(())
    }
}

#[async_trait]
impl AuditStore for MockStore {
    async fn create(&self, mut record: MessageEventRecord) -> Upsert<MessageEventRecord> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Upsert::NotCreated;
        }
        if record.created_at.is_empty() {
            record.created_at = chrono::Utc::now()
                .format("%Y-%m-%dT%H:%M:%S%.3fZ")
                .to_string();
        }
        match self.records.entry(record.job_id.clone()) {
            Entry::Occupied(existing) => Upsert::Found(existing.get().clone()),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Upsert::Created(record)
            }
        }
    }

    async fn select(
        &self,
        channel: &str,
        since: &str,
    ) -> Result<Vec<MessageEventRecord>, BugMasterError> {
        Ok(self
            .records()
            .into_iter()
            .filter(|r| r.channel_id == channel && r.created_at.as_str() >= since)
            .collect())
    }
}
