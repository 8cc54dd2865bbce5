// SPDX-FileCopyrightText: 2026 BugMaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded database migrations using refinery.
//!
//! SQL migration files are compiled into the binary at build time via
//! `embed_migrations!`. Migrations run automatically on database open.

use bugmaster_core::BugMasterError;

use crate::database::Database;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Run all pending migrations on the database's writer connection.
///
/// Refinery tracks applied migrations in its own `refinery_schema_history` table.
pub(crate) async fn run(db: &Database) -> Result<(), BugMasterError> {
    let report = db
        .connection()
        .call(|conn| embedded::migrations::runner().run(conn))
        .await
        .map_err(|e| BugMasterError::Storage {
            source: e.to_string().into(),
        })?;
    tracing::debug!(
        applied = report.applied_migrations().len(),
        "database migrations complete"
    );
    Ok(())
}
