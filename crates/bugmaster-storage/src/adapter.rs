// SPDX-FileCopyrightText: 2026 BugMaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the AuditStore trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, error};

use bugmaster_config::model::StorageConfig;
use bugmaster_core::{
    AdapterType, AuditStore, BugMasterError, HealthStatus, MessageEventRecord, PluginAdapter,
    Upsert,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed audit store.
///
/// The database is lazily opened by [`SqliteStorage::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    ///
    /// The database connection is not opened until [`initialize`](Self::initialize) is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Wrap an already opened database.
    pub fn with_database(config: StorageConfig, db: Database) -> Self {
        Self {
            config,
            db: OnceCell::new_with(Some(db)),
        }
    }

    /// Open the database file and run migrations.
    pub async fn initialize(&self) -> Result<(), BugMasterError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| BugMasterError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    /// Returns a reference to the underlying Database, or an error if not initialized.
    fn db(&self) -> Result<&Database, BugMasterError> {
        self.db.get().ok_or_else(|| BugMasterError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, BugMasterError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), BugMasterError> {
        if let Some(db) = self.db.get()
            && self.config.wal_mode
        {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl AuditStore for SqliteStorage {
    async fn create(&self, record: MessageEventRecord) -> Upsert<MessageEventRecord> {
        let db = match self.db() {
            Ok(db) => db,
            Err(e) => {
                error!(job_id = %record.job_id, error = %e, "audit store unavailable");
                return Upsert::NotCreated;
            }
        };
        match queries::message_events::create_or_get(db, &record).await {
            Ok((stored, true)) => Upsert::Created(stored),
            Ok((stored, false)) => {
                debug!(job_id = %stored.job_id, "audit record already exists");
                Upsert::Found(stored)
            }
            Err(e) => {
                error!(job_id = %record.job_id, error = %e, "failed to write audit record");
                Upsert::NotCreated
            }
        }
    }

    async fn select(
        &self,
        channel: &str,
        since: &str,
    ) -> Result<Vec<MessageEventRecord>, BugMasterError> {
        queries::message_events::select_since(self.db()?, channel, since).await
    }
}
