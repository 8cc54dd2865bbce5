// SPDX-FileCopyrightText: 2026 BugMaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slack request signature verification.
//!
//! Every Slack delivery carries `X-Slack-Request-Timestamp` and
//! `X-Slack-Signature` headers. The signature is `v0=` followed by the hex
//! HMAC-SHA256 of `v0:{timestamp}:{body}` keyed with the app's signing secret.
//! Timestamps more than five minutes away from now are rejected as replays.
//!
//! When no signing secret is configured, verification is skipped.

use axum::{
    body::{Body, to_bytes},
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const TIMESTAMP_HEADER: &str = "x-slack-request-timestamp";
pub const SIGNATURE_HEADER: &str = "x-slack-signature";

/// Maximum accepted clock skew between Slack and us, in seconds.
pub const MAX_TIMESTAMP_AGE_SECS: u64 = 5 * 60;

/// Largest request body buffered for verification.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

const SIGNATURE_VERSION: &str = "v0";

/// Signature verification configuration.
#[derive(Clone, Default)]
pub struct AuthConfig {
    /// Slack app signing secret. `None` disables verification.
    pub signing_secret: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field(
                "signing_secret",
                &self.signing_secret.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}

fn mac_for(secret: &str, timestamp: &str, body: &[u8]) -> Option<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(format!("{SIGNATURE_VERSION}:{timestamp}:").as_bytes());
    mac.update(body);
    Some(mac)
}

/// The `X-Slack-Signature` value Slack would send for this request.
pub fn compute_signature(secret: &str, timestamp: &str, body: &[u8]) -> String {
    match mac_for(secret, timestamp, body) {
        Some(mac) => format!(
            "{SIGNATURE_VERSION}={}",
            hex::encode(mac.finalize().into_bytes())
        ),
        None => String::new(),
    }
}

/// Check a request signature and its timestamp window against `now` (unix seconds).
pub fn verify_signature(
    secret: &str,
    timestamp: &str,
    body: &[u8],
    signature: &str,
    now: i64,
) -> bool {
    let Ok(sent_at) = timestamp.parse::<i64>() else {
        return false;
    };
    let skew_secs = now.abs_diff(sent_at);
    if skew_secs > MAX_TIMESTAMP_AGE_SECS {
        tracing::debug!(skew_secs, "slack signature rejected: timestamp outside window");
        return false;
    }
    let Some(expected) = signature
        .strip_prefix("v0=")
        .and_then(|hex_sig| hex::decode(hex_sig).ok())
    else {
        return false;
    };
    match mac_for(secret, timestamp, body) {
        Some(mac) => mac.verify_slice(&expected).is_ok(),
        None => false,
    }
}

/// Middleware that rejects requests without a valid Slack signature.
///
/// The body is buffered so the signature can cover it, then handed on
/// unchanged to the route handler.
pub async fn signature_middleware(
    State(auth): State<AuthConfig>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(secret) = auth.signing_secret.as_deref() else {
        tracing::warn!("no slack signing secret configured -- skipping request verification");
        return Ok(next.run(request).await);
    };

    let (parts, body) = request.into_parts();
    let header = |name: &str| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let (Some(timestamp), Some(signature)) = (header(TIMESTAMP_HEADER), header(SIGNATURE_HEADER))
    else {
        tracing::debug!("slack signature headers missing");
        return Err(StatusCode::UNAUTHORIZED);
    };

    let bytes = to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|_| StatusCode::PAYLOAD_TOO_LARGE)?;

    let now = chrono::Utc::now().timestamp();
    if !verify_signature(secret, &timestamp, &bytes, &signature, now) {
        tracing::warn!(uri = %parts.uri, "rejecting request with invalid slack signature");
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(next.run(Request::from_parts(parts, Body::from(bytes))).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Example values from Slack's request verification guide.
    const SECRET: &str = "8f742231b10e8888abcd99yyyzzz85a5";
    const TIMESTAMP: &str = "1531420618";
    const BODY: &str = "token=xyzz0WbapA4vBCDEFasx0q6G&team_id=T1DC2JH3J&team_domain=testteamnow&channel_id=G8PSS9T3V&channel_name=foobar&user_id=U2CERLKJA&user_name=roadrunner&command=%2Fwebhook-collect&text=&response_url=https%3A%2F%2Fhooks.slack.com%2Fcommands%2FT1DC2JH3J%2F397700885554%2F96rGlfmibIGlgcZRskXaIFfN&trigger_id=398738663015.47445629121.803a0bc887a14d10d2c447fce8b6703c";
    const SIGNATURE: &str =
        "v0=a2114d57b48eac39b9ad189dd8316235a7b4a8d21a10bd27519666489c69b503";

    #[test]
    fn matches_published_example() {
        assert_eq!(compute_signature(SECRET, TIMESTAMP, BODY.as_bytes()), SIGNATURE);
        assert!(verify_signature(
            SECRET,
            TIMESTAMP,
            BODY.as_bytes(),
            SIGNATURE,
            1531420618 + 10
        ));
    }

    #[test]
    fn rejects_tampered_body() {
        assert!(!verify_signature(
            SECRET,
            TIMESTAMP,
            b"token=other",
            SIGNATURE,
            1531420618
        ));
    }

    #[test]
    fn rejects_stale_timestamp() {
        assert!(!verify_signature(
            SECRET,
            TIMESTAMP,
            BODY.as_bytes(),
            SIGNATURE,
            1531420618 + MAX_TIMESTAMP_AGE_SECS as i64 + 1
        ));
    }

    #[test]
    fn rejects_malformed_signature() {
        for signature in ["", "v1=abcd", "v0=not-hex"] {
            assert!(!verify_signature(
                SECRET,
                TIMESTAMP,
                BODY.as_bytes(),
                signature,
                1531420618
            ));
        }
        assert!(!verify_signature(SECRET, "yesterday", BODY.as_bytes(), SIGNATURE, 0));
    }

    #[test]
    fn rejects_extreme_timestamps() {
        for timestamp in ["-9223372036854775808", "9223372036854775807"] {
            assert!(!verify_signature(
                SECRET,
                timestamp,
                BODY.as_bytes(),
                SIGNATURE,
                1_700_000_000
            ));
        }
        assert!(!verify_signature(
            SECRET,
            TIMESTAMP,
            BODY.as_bytes(),
            SIGNATURE,
            i64::MIN
        ));
    }

    #[test]
    fn debug_redacts_secret() {
        let config = AuthConfig {
            signing_secret: Some(SECRET.to_string()),
        };
        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains(SECRET));
        assert!(debug_output.contains("[redacted]"));
    }
}
