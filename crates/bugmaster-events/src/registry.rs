// SPDX-FileCopyrightText: 2026 BugMaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Static `(type, subtype)` -> handler table.

use bugmaster_core::{BugMasterError, EventEnvelope, HandlerResponse};
use tracing::{debug, info};

use crate::channel_join::ChannelJoinEvent;
use crate::context::EventContext;
use crate::file_events::{FileChangeEvent, FileShareEvent};
use crate::handler::EventHandler;
use crate::message::MessageChannelEvent;
use crate::url_verification::UrlVerificationEvent;

pub const MESSAGE_TYPE: &str = "message";
pub const URL_VERIFICATION: &str = "url_verification";
pub const CHANNEL_JOIN_SUBTYPE: &str = "channel_join";
pub const FILE_SHARE_SUBTYPE: &str = "file_share";
pub const FILE_CHANGE_EVENT: &str = "file_change";

type Constructor = fn(&EventEnvelope) -> Box<dyn EventHandler>;

fn message(e: &EventEnvelope) -> Box<dyn EventHandler> {
    Box::new(MessageChannelEvent::new(e))
}

fn url_verification(e: &EventEnvelope) -> Box<dyn EventHandler> {
    Box::new(UrlVerificationEvent::new(e))
}

fn file_share(e: &EventEnvelope) -> Box<dyn EventHandler> {
    Box::new(FileShareEvent::new(e))
}

fn channel_join(e: &EventEnvelope) -> Box<dyn EventHandler> {
    Box::new(ChannelJoinEvent::new(e))
}

fn file_change(e: &EventEnvelope) -> Box<dyn EventHandler> {
    Box::new(FileChangeEvent::new(e))
}

/// Every supported event, keyed by `(type, subtype)`; a missing subtype is `""`.
const SUPPORTED_EVENTS: &[((&str, &str), Constructor)] = &[
    ((MESSAGE_TYPE, ""), message),
    ((URL_VERIFICATION, ""), url_verification),
    ((MESSAGE_TYPE, FILE_SHARE_SUBTYPE), file_share),
    ((MESSAGE_TYPE, CHANNEL_JOIN_SUBTYPE), channel_join),
    ((FILE_CHANGE_EVENT, ""), file_change),
];

/// The `(type, subtype)` pairs with a registered handler.
pub fn supported_events() -> impl Iterator<Item = (&'static str, &'static str)> {
    SUPPORTED_EVENTS.iter().map(|(key, _)| *key)
}

/// Build the handler registered for the envelope's dispatch key.
pub fn get_event_handler(
    envelope: &EventEnvelope,
) -> Result<Box<dyn EventHandler>, BugMasterError> {
    let (event_type, subtype) = envelope.dispatch_key();
    SUPPORTED_EVENTS
        .iter()
        .find(|((t, s), _)| *t == event_type && *s == subtype)
        .map(|(_, constructor)| constructor(envelope))
        .ok_or_else(|| BugMasterError::NotSupportedEvent {
            event_type: event_type.to_string(),
            subtype: subtype.to_string(),
        })
}

/// Resolve and run the handler for one webhook delivery.
pub async fn dispatch_event(
    ctx: &EventContext,
    envelope: &EventEnvelope,
) -> Result<HandlerResponse, BugMasterError> {
    let handler = get_event_handler(envelope)?;
    let (event_type, subtype) = envelope.dispatch_key();
    info!(
        handler = handler.name(),
        event_type,
        subtype,
        event_id = ?envelope.event_id,
        "handling event"
    );
    let response = handler.handle(ctx).await?;
    debug!(handler = handler.name(), code = response.code, "event handled");
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(value: serde_json::Value) -> EventEnvelope {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn resolves_each_supported_key() {
        let cases = [
            (json!({"type": "event_callback", "event": {"type": "message"}}), "message"),
            (json!({"type": "url_verification", "challenge": "c"}), "url_verification"),
            (
                json!({"type": "event_callback", "event": {"type": "message", "subtype": "file_share"}}),
                "file_share",
            ),
            (
                json!({"type": "event_callback", "event": {"type": "message", "subtype": "channel_join"}}),
                "channel_join",
            ),
            (
                json!({"type": "event_callback", "event": {"type": "file_change", "file_id": "F1"}}),
                "file_change",
            ),
        ];
        for (value, name) in cases {
            let handler = get_event_handler(&envelope(value)).unwrap();
            assert_eq!(handler.name(), name);
        }
    }

    #[test]
    fn unknown_subtype_is_not_supported() {
        let err = get_event_handler(&envelope(json!({
            "type": "event_callback",
            "event": {"type": "message", "subtype": "message_changed"}
        })))
        .err()
        .unwrap();
        match err {
            BugMasterError::NotSupportedEvent {
                event_type,
                subtype,
            } => {
                assert_eq!(event_type, "message");
                assert_eq!(subtype, "message_changed");
            }
            other => panic!("expected NotSupportedEvent, got {other:?}"),
        }
    }

    #[test]
    fn unknown_type_is_not_supported() {
        let err = get_event_handler(&envelope(json!({
            "type": "event_callback",
            "event": {"type": "reaction_added"}
        })))
        .err()
        .unwrap();
        assert!(matches!(err, BugMasterError::NotSupportedEvent { .. }));
    }

    #[test]
    fn supported_events_lists_table() {
        let keys: Vec<_> = supported_events().collect();
        assert_eq!(keys.len(), 5);
        assert!(keys.contains(&("message", "")));
        assert!(keys.contains(&("file_change", "")));
    }
}
