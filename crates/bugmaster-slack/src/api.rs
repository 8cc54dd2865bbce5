// SPDX-FileCopyrightText: 2026 BugMaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Thin HTTP client for the Slack Web API.
//!
//! Every method answers `{"ok": bool, "error": "..."}`; [`SlackApi`] turns
//! `ok: false` into [`BugMasterError::Chat`] carrying the Slack error code.

use std::time::Duration;

use bugmaster_core::{BugMasterError, SharedFile};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Default timeout for Web API calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// `auth.test` response.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthTest {
    pub user_id: String,
    #[serde(default)]
    pub bot_id: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
}

/// `conversations.history` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct History {
    #[serde(default)]
    pub messages: Vec<HistoryMessage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryMessage {
    #[serde(default)]
    pub ts: Option<String>,
    #[serde(default)]
    pub files: Vec<SharedFile>,
}

/// `conversations.info` response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelInfo {
    pub channel: ChannelDetails,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChannelDetails {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Slack Web API error code carried in [`BugMasterError::Chat`].
pub fn slack_error_code(err: &BugMasterError) -> Option<&str> {
    match err {
        BugMasterError::Chat { message, .. } => Some(message.as_str()),
        _ => None,
    }
}

/// Authenticated Web API client.
#[derive(Debug, Clone)]
pub struct SlackApi {
    client: reqwest::Client,
    base_url: String,
}

impl SlackApi {
    /// Creates a client sending `token` as bearer authorization to `base_url`.
    pub fn new(token: &str, base_url: &str) -> Result<Self, BugMasterError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| BugMasterError::Config(format!("invalid bot token header value: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| BugMasterError::Chat {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{method}", self.base_url)
    }

    /// POST a JSON body to a write method.
    pub async fn post<T: DeserializeOwned>(
        &self,
        method: &str,
        body: &serde_json::Value,
    ) -> Result<T, BugMasterError> {
        let response = self
            .client
            .post(self.method_url(method))
            .json(body)
            .send()
            .await
            .map_err(|e| transport_error(method, e))?;
        decode(method, response).await
    }

    /// GET a read method with query parameters.
    pub async fn get<T: DeserializeOwned>(
        &self,
        method: &str,
        params: &[(&str, &str)],
    ) -> Result<T, BugMasterError> {
        let url = reqwest::Url::parse_with_params(&self.method_url(method), params).map_err(
            |e| BugMasterError::Chat {
                message: format!("invalid URL for {method}: {e}"),
                source: Some(Box::new(e)),
            },
        )?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(method, e))?;
        decode(method, response).await
    }

    /// Download a private file with the bot's credentials.
    pub async fn download(&self, url: &str) -> Result<String, BugMasterError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error("file download", e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(BugMasterError::Chat {
                message: format!("file download returned {status}"),
                source: None,
            });
        }
        response.text().await.map_err(|e| transport_error("file download", e))
    }
}

fn transport_error(method: &str, e: reqwest::Error) -> BugMasterError {
    BugMasterError::Chat {
        message: format!("{method} request failed: {e}"),
        source: Some(Box::new(e)),
    }
}

async fn decode<T: DeserializeOwned>(
    method: &str,
    response: reqwest::Response,
) -> Result<T, BugMasterError> {
    let status = response.status();
    let body: serde_json::Value = response.json().await.map_err(|e| BugMasterError::Chat {
        message: format!("{method} returned {status} with unreadable body: {e}"),
        source: Some(Box::new(e)),
    })?;

    if body.get("ok").and_then(|v| v.as_bool()) != Some(true) {
        let code = body
            .get("error")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown_error")
            .to_string();
        debug!(method, error = %code, "slack api call rejected");
        return Err(BugMasterError::Chat {
            message: code,
            source: None,
        });
    }

    serde_json::from_value(body).map_err(|e| BugMasterError::Chat {
        message: format!("unexpected {method} response: {e}"),
        source: Some(Box::new(e)),
    })
}
