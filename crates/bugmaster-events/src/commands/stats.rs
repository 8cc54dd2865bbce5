// SPDX-FileCopyrightText: 2026 BugMaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `stats [days]`: failure counts per job from the audit store.

use std::collections::HashMap;

use async_trait::async_trait;
use bugmaster_core::types::CommandReply;
use bugmaster_core::{BugMasterError, MessageEventRecord};
use chrono::{Days, NaiveDate, Utc};
use tracing::debug;

use super::{Command, CommandRequest};
use crate::context::EventContext;

pub const DESCRIPTION: &str =
    "Print statistics of the last x days. Command: /bugmaster stats <integer> (default=3).";

pub const DEFAULT_HISTORY_DAYS: u64 = 3;

pub struct StatisticsCommand {
    channel: String,
    days: Result<u64, String>,
}

impl StatisticsCommand {
    pub fn new(request: &CommandRequest, args: Vec<String>) -> Self {
        Self {
            channel: request.channel_id.clone(),
            days: parse_days(args.first().map(String::as_str)),
        }
    }
}

/// Parse the history window. Missing means the default; anything but a
/// positive integer is rejected with the offending argument.
pub fn parse_days(arg: Option<&str>) -> Result<u64, String> {
    let Some(arg) = arg else {
        return Ok(DEFAULT_HISTORY_DAYS);
    };
    match arg.parse::<i64>() {
        Ok(days) if days > 0 => Ok(days as u64),
        _ => Err(arg.to_string()),
    }
}

/// Midnight UTC `days` days before `today`, in the store's timestamp format.
pub fn since_timestamp(today: NaiveDate, days: u64) -> String {
    let start = today.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN);
    format!("{}T00:00:00.000Z", start.format("%Y-%m-%d"))
}

/// Days from the oldest record to `today`, inclusive; 1 when there is none.
///
/// Timestamps that do not start with a `YYYY-MM-DD` date are ignored.
pub fn covered_days(today: NaiveDate, records: &[MessageEventRecord]) -> u64 {
    let oldest = records
        .iter()
        .filter_map(|r| r.created_at.get(..10))
        .filter_map(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
        .min()
        .unwrap_or(today)
        .min(today);
    today.signed_duration_since(oldest).num_days().unsigned_abs() + 1
}

/// Count records per job, highest count first, ties by name.
pub fn count_by_job(records: &[MessageEventRecord]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        *counts.entry(record.job_name.as_str()).or_default() += 1;
    }
    let mut counts: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

fn render(counts: &[(String, usize)], days: u64, link_host: &str) -> String {
    let mut text = format!("Statistics for the last {days} days:\n");
    for (name, count) in counts {
        text.push_str(&format!(
            "{count:>4}  <https://{link_host}/?job=*{name}*|{name}>\n"
        ));
    }
    text.push_str(&format!(
        "Total: {}",
        counts.iter().map(|(_, c)| c).sum::<usize>()
    ));
    text
}

#[async_trait]
impl Command for StatisticsCommand {
    async fn handle(&self, ctx: &EventContext) -> Result<CommandReply, BugMasterError> {
        let days = match &self.days {
            Ok(days) => *days,
            Err(arg) => {
                return Ok(CommandReply::ephemeral(format!(
                    "Invalid number of history days, got `{arg}`. Positive integer is required."
                )));
            }
        };

        let today = Utc::now().date_naive();
        let since = since_timestamp(today, days);
        debug!(channel = %self.channel, since = %since, "collecting statistics");
        let records = ctx.store.select(&self.channel, &since).await?;
        let covered = covered_days(today, &records);
        if records.is_empty() {
            return Ok(CommandReply::ephemeral(format!(
                "There are no records for this channel in the last {covered} days."
            )));
        }

        let counts = count_by_job(&records);
        Ok(CommandReply::ephemeral(render(
            &counts,
            covered,
            &ctx.settings.link_host,
        )))
    }
}
