// SPDX-FileCopyrightText: 2026 BugMaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound webhook payload types.
//!
//! Mirrors the Slack Events API envelope. Everything except the envelope
//! `type` is optional; the nested block structure is kept as raw JSON so that
//! malformed blocks never reject a delivery.

use serde::{Deserialize, Serialize};

/// Outer webhook envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    #[serde(rename = "type")]
    pub envelope_type: String,
    #[serde(default)]
    pub challenge: Option<String>,
    #[serde(default)]
    pub event_id: Option<String>,
    #[serde(default)]
    pub team_id: Option<String>,
    #[serde(default)]
    pub event: Option<EventData>,
}

impl EventEnvelope {
    /// Registry key: the inner event type when present, else the envelope type,
    /// paired with the subtype (empty when absent).
    pub fn dispatch_key(&self) -> (&str, &str) {
        match &self.event {
            Some(event) => (
                event.event_type.as_str(),
                event.subtype.as_deref().unwrap_or(""),
            ),
            None => (self.envelope_type.as_str(), ""),
        }
    }

    /// The inner event, or an empty one for envelope-only deliveries.
    pub fn data(&self) -> EventData {
        self.event.clone().unwrap_or_default()
    }
}

/// Inner event data carried by an `event_callback` delivery.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventData {
    #[serde(rename = "type", default)]
    pub event_type: String,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub ts: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub bot_id: Option<String>,
    #[serde(default)]
    pub files: Vec<SharedFile>,
    /// Rich-text blocks, walked leniently by the link extractor.
    #[serde(default)]
    pub blocks: serde_json::Value,
    /// Set on `file_change` events.
    #[serde(default)]
    pub file_id: Option<String>,
}

impl EventData {
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    pub fn channel(&self) -> &str {
        self.channel.as_deref().unwrap_or("")
    }

    pub fn has_files(&self) -> bool {
        !self.files.is_empty()
    }
}

impl std::fmt::Display for EventData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "user: {}, channel: {}, ts: {}, has_file: {}",
            self.user.as_deref().unwrap_or("-"),
            self.channel(),
            self.ts.as_deref().unwrap_or("-"),
            self.has_files()
        )
    }
}

/// A file attached to a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedFile {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url_private_download: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_key_uses_inner_event() {
        let envelope: EventEnvelope = serde_json::from_value(serde_json::json!({
            "type": "event_callback",
            "event": {"type": "message", "subtype": "channel_join", "channel": "C1"}
        }))
        .unwrap();
        assert_eq!(envelope.dispatch_key(), ("message", "channel_join"));
    }

    #[test]
    fn dispatch_key_without_inner_event() {
        let envelope: EventEnvelope = serde_json::from_value(serde_json::json!({
            "type": "url_verification",
            "challenge": "xyz"
        }))
        .unwrap();
        assert_eq!(envelope.dispatch_key(), ("url_verification", ""));
        assert_eq!(envelope.challenge.as_deref(), Some("xyz"));
    }

    #[test]
    fn malformed_blocks_still_deserialize() {
        let envelope: EventEnvelope = serde_json::from_value(serde_json::json!({
            "type": "event_callback",
            "event": {"type": "message", "text": "hi", "blocks": "not-an-array"}
        }))
        .unwrap();
        let data = envelope.data();
        assert_eq!(data.text(), "hi");
        assert!(data.blocks.is_string());
    }
}
