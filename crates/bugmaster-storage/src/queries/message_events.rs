// SPDX-FileCopyrightText: 2026 BugMaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Audit record operations for processed failure links.

use bugmaster_core::{BugMasterError, MessageEventRecord};
use rusqlite::{Row, params};

use crate::database::{Database, map_tr_err};

const COLUMNS: &str = "id, job_name, user, thread_ts, url, channel_id, created_at";

fn from_row(row: &Row<'_>) -> rusqlite::Result<MessageEventRecord> {
    Ok(MessageEventRecord {
        job_id: row.get(0)?,
        job_name: row.get(1)?,
        user: row.get(2)?,
        thread_ts: row.get(3)?,
        url: row.get(4)?,
        channel_id: row.get(5)?,
        created_at: row.get(6)?,
    })
}

/// Current time in the lexicographically sortable format stored in `created_at`.
pub fn now_timestamp() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}

/// Insert the record unless its id exists, then read back the stored row.
///
/// Both statements run in one closure on the writer thread, so concurrent
/// calls for the same id observe a single winner. Returns the stored row and
/// whether this call created it.
pub async fn create_or_get(
    db: &Database,
    record: &MessageEventRecord,
) -> Result<(MessageEventRecord, bool), BugMasterError> {
    let mut record = record.clone();
    if record.created_at.is_empty() {
        record.created_at = now_timestamp();
    }
    db.connection()
        .call(move |conn| -> Result<(MessageEventRecord, bool), rusqlite::Error> {
            let inserted = conn.execute(
                "INSERT INTO message_events (id, job_name, user, thread_ts, url, channel_id, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(id) DO NOTHING",
                params![
                    record.job_id,
                    record.job_name,
                    record.user,
                    record.thread_ts,
                    record.url,
                    record.channel_id,
                    record.created_at,
                ],
            )?;
            let stored = conn.query_row(
                &format!("SELECT {COLUMNS} FROM message_events WHERE id = ?1"),
                params![record.job_id],
                from_row,
            )?;
            Ok((stored, inserted == 1))
        })
        .await
        .map_err(map_tr_err)
}

/// Records of `channel_id` created at or after `since`, oldest first.
pub async fn select_since(
    db: &Database,
    channel_id: &str,
    since: &str,
) -> Result<Vec<MessageEventRecord>, BugMasterError> {
    let channel_id = channel_id.to_string();
    let since = since.to_string();
    db.connection()
        .call(move |conn| -> Result<Vec<MessageEventRecord>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM message_events
                 WHERE channel_id = ?1 AND created_at >= ?2
                 ORDER BY created_at ASC"
            ))?;
            let rows = stmt.query_map(params![channel_id, since], from_row)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}
