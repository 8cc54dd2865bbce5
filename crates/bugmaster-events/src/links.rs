// SPDX-FileCopyrightText: 2026 BugMaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Candidate URL extraction from message payloads.

use std::sync::LazyLock;

use bugmaster_core::EventData;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://[\w/\-?=%.]+\.[\w/\-&?=%.]+").expect("valid URL regex")
});

/// URLs of every `link` element nested under `blocks[].elements[].elements[]`.
///
/// Any level that is missing or not an array contributes nothing.
fn block_links(blocks: &Value) -> Vec<String> {
    let children = |value: &Value, key: &str| -> Vec<Value> {
        value
            .get(key)
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default()
    };

    let Some(blocks) = blocks.as_array() else {
        return Vec::new();
    };

    let mut urls = Vec::new();
    for block in blocks {
        for element in children(block, "elements") {
            for nested in children(&element, "elements") {
                if nested.get("type").and_then(Value::as_str) == Some("link")
                    && let Some(url) = nested.get("url").and_then(Value::as_str)
                {
                    urls.push(url.to_string());
                }
            }
        }
    }
    urls
}

/// URLs in free text that contain `host`.
fn text_links(text: &str, host: &str) -> Vec<String> {
    URL_PATTERN
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|url| url.contains(host))
        .map(str::to_string)
        .collect()
}

/// Candidate report links of a message, in document order.
///
/// Structured link elements win; the text scan only runs when there are none.
pub fn extract_links(event: &EventData, host: &str) -> Vec<String> {
    let mut urls = block_links(&event.blocks);
    if urls.is_empty() {
        urls = text_links(event.text(), host);
    }
    debug!(count = urls.len(), channel = %event.channel(), "links extracted");
    urls
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const HOST: &str = "prow.ci.openshift.org";

    fn event(blocks: Value, text: &str) -> EventData {
        EventData {
            event_type: "message".into(),
            text: Some(text.into()),
            blocks,
            ..Default::default()
        }
    }

    #[test]
    fn nested_link_elements_in_document_order() {
        let blocks = json!([
            {"type": "rich_text", "elements": [
                {"type": "rich_text_section", "elements": [
                    {"type": "link", "url": "https://a.example/1"},
                    {"type": "text", "text": "job failed"},
                    {"type": "link", "url": "https://a.example/2"}
                ]}
            ]},
            {"type": "rich_text", "elements": [
                {"type": "rich_text_section", "elements": [
                    {"type": "link", "url": "https://a.example/3"}
                ]}
            ]}
        ]);
        let links = extract_links(&event(blocks, ""), HOST);
        assert_eq!(
            links,
            vec![
                "https://a.example/1",
                "https://a.example/2",
                "https://a.example/3"
            ]
        );
    }

    #[test]
    fn text_fallback_keeps_only_report_host() {
        let text = "see https://prow.ci.openshift.org/view/gcs/x/y.html and http://example.com/z.html";
        let links = extract_links(&event(Value::Null, text), HOST);
        assert_eq!(links, vec!["https://prow.ci.openshift.org/view/gcs/x/y.html"]);
    }

    #[test]
    fn block_links_suppress_text_scan() {
        let blocks = json!([{"elements": [{"elements": [
            {"type": "link", "url": "https://a.example/only"}
        ]}]}]);
        let text = "https://prow.ci.openshift.org/view/gcs/x/y.html";
        assert_eq!(
            extract_links(&event(blocks, text), HOST),
            vec!["https://a.example/only"]
        );
    }

    #[test]
    fn malformed_blocks_yield_nothing() {
        for blocks in [
            json!("not-an-array"),
            json!([{"elements": "nope"}]),
            json!([{"elements": [{"elements": [{"type": "link"}]}]}]),
            json!([42, {"elements": [7]}]),
        ] {
            assert!(extract_links(&event(blocks, "no urls here"), HOST).is_empty());
        }
    }

    #[test]
    fn empty_text_yields_nothing() {
        assert!(extract_links(&EventData::default(), HOST).is_empty());
    }
}
