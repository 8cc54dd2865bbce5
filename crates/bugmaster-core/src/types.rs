// SPDX-FileCopyrightText: 2026 BugMaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across collaborator traits and event handlers.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a [`PluginAdapter`](crate::PluginAdapter).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Chat,
    Storage,
    ReportSource,
}

// --- Comments and reactions ---

/// Presentation ordering key for comments posted on a failure thread.
///
/// The discriminant is the ordinal: comments are posted in ascending order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CommentType {
    ErrorInfo = 1,
    Assignee = 2,
    MoreInfo = 3,
}

/// A single comment to post in a failure thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub text: String,
    pub comment_type: CommentType,
    /// Ask the chat platform to apply full link/mention parsing.
    pub parse: bool,
}

impl Comment {
    pub fn new(text: impl Into<String>, comment_type: CommentType, parse: bool) -> Self {
        Self {
            text: text.into(),
            comment_type,
            parse,
        }
    }
}

/// Reactions and comments derived from one failure report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FailureActions {
    pub emojis: Vec<String>,
    pub comments: Vec<Comment>,
}

// --- Audit records ---

/// Persisted record of one processed failure link, keyed by the job's build id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEventRecord {
    pub job_id: String,
    pub job_name: String,
    pub user: Option<String>,
    pub thread_ts: Option<String>,
    pub url: String,
    pub channel_id: String,
    /// ISO 8601 creation time; assigned by the store when empty.
    pub created_at: String,
}

/// Result of a create-or-fetch call against a store.
///
/// Stores never raise from `create`: unrecoverable database errors surface as
/// [`Upsert::NotCreated`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Upsert<T> {
    /// A new row was written.
    Created(T),
    /// A row with the same id already existed and is returned unchanged.
    Found(T),
    /// The store could not write or read the row.
    NotCreated,
}

impl<T> Upsert<T> {
    /// The stored record, if any.
    pub fn into_record(self) -> Option<T> {
        match self {
            Upsert::Created(r) | Upsert::Found(r) => Some(r),
            Upsert::NotCreated => None,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Upsert::Created(_))
    }
}

// --- Handler responses ---

/// JSON acknowledgment returned to the chat platform for each webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerResponse {
    pub msg: String,
    #[serde(rename = "Code")]
    pub code: u16,
    /// Echoed challenge for url verification handshakes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge: Option<String>,
}

impl HandlerResponse {
    pub fn success() -> Self {
        Self {
            msg: "Success".to_string(),
            code: 200,
            challenge: None,
        }
    }

    pub fn failure(code: u16) -> Self {
        Self {
            msg: "Failure".to_string(),
            code,
            challenge: None,
        }
    }

    pub fn challenge(challenge: impl Into<String>) -> Self {
        Self {
            challenge: Some(challenge.into()),
            ..Self::success()
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == 200
    }
}

/// Reply to a slash command, rendered privately to the invoking user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandReply {
    pub response_type: String,
    pub text: String,
}

impl CommandReply {
    pub fn ephemeral(text: impl Into<String>) -> Self {
        Self {
            response_type: "ephemeral".to_string(),
            text: text.into(),
        }
    }
}

// --- Channel configuration ---

/// Per-channel rule set, uploaded to the channel as a TOML file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChannelConfiguration {
    /// Suppress assignee mentions for the whole channel.
    #[serde(default)]
    pub disable_auto_assign: bool,

    #[serde(default)]
    pub actions: Vec<ActionRule>,
}

/// One rule: when its conditions hold for a job, react and comment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActionRule {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub action_id: Option<String>,
    #[serde(default)]
    pub emoji: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub contains: Option<String>,
    #[serde(default)]
    pub file_path: Option<String>,
    /// Job name prefix that matches unconditionally.
    #[serde(default)]
    pub job_name: Option<String>,
    #[serde(default)]
    pub ignore_others: bool,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub assignees: Option<Assignees>,
}

impl ActionRule {
    /// Explicit conditions, or a single condition built from the rule's own fields.
    pub fn effective_conditions(&self) -> Vec<Condition> {
        if !self.conditions.is_empty() {
            return self.conditions.clone();
        }
        vec![Condition {
            contains: self.contains.clone().unwrap_or_default(),
            file_path: self.file_path.clone().unwrap_or_default(),
        }]
    }
}

/// A file-content condition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Condition {
    #[serde(default)]
    pub contains: String,
    #[serde(default)]
    pub file_path: String,
}

/// Users to mention when a rule matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Assignees {
    #[serde(default)]
    pub users: Vec<String>,
    #[serde(default)]
    pub issue_url: Option<String>,
    #[serde(default)]
    pub disable_auto_assign: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_type_orders_by_priority() {
        assert!(CommentType::ErrorInfo < CommentType::Assignee);
        assert!(CommentType::Assignee < CommentType::MoreInfo);
    }

    #[test]
    fn handler_response_uses_capitalised_code_key() {
        let json = serde_json::to_value(HandlerResponse::failure(401)).unwrap();
        assert_eq!(json["msg"], "Failure");
        assert_eq!(json["Code"], 401);
        assert!(json.get("challenge").is_none());
    }

    #[test]
    fn challenge_response_carries_challenge() {
        let json = serde_json::to_value(HandlerResponse::challenge("abc")).unwrap();
        assert_eq!(json["challenge"], "abc");
        assert_eq!(json["Code"], 200);
    }

    #[test]
    fn upsert_into_record() {
        assert_eq!(Upsert::Created(1).into_record(), Some(1));
        assert_eq!(Upsert::Found(2).into_record(), Some(2));
        assert_eq!(Upsert::<i32>::NotCreated.into_record(), None);
    }

    #[test]
    fn effective_conditions_fall_back_to_rule_fields() {
        let rule = ActionRule {
            contains: Some("timeout".into()),
            file_path: Some("build-log.txt".into()),
            ..Default::default()
        };
        let conditions = rule.effective_conditions();
        assert_eq!(conditions.len(), 1);
        assert_eq!(conditions[0].contains, "timeout");
        assert_eq!(conditions[0].file_path, "build-log.txt");
    }
}
