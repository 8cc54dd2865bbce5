// SPDX-FileCopyrightText: 2026 BugMaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for Prow job artifacts.
//!
//! Provides [`ArtifactClient`] which fetches artifact files from the job's
//! storage bucket and caches their contents.

use std::time::Duration;

use bugmaster_core::BugMasterError;
use tracing::{debug, warn};

use crate::cache::{ContentCache, DEFAULT_MAX_ENTRIES};

/// Fetches artifact files over HTTP with a TTL cache in front.
pub struct ArtifactClient {
    client: reqwest::Client,
    cache: ContentCache,
}

impl ArtifactClient {
    /// Creates a new client with a per-request `timeout` and cache `ttl`.
    pub fn new(timeout: Duration, ttl: Duration) -> Result<Self, BugMasterError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BugMasterError::Report {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            cache: ContentCache::new(ttl, DEFAULT_MAX_ENTRIES),
        })
    }

    /// Fetch the file at `url`.
    ///
    /// Returns `Ok(None)` for client errors (missing artifact, forbidden) and
    /// an error for transport failures and server errors.
    pub async fn fetch(&self, url: &str) -> Result<Option<String>, BugMasterError> {
        if let Some(cached) = self.cache.get(url) {
            debug!(url, "artifact cache hit");
            return Ok(cached);
        }

        debug!(url, "fetching artifact");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| BugMasterError::Report {
                message: format!("HTTP request to {url} failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if status.is_server_error() {
            warn!(url, status = %status, "artifact server error");
            return Err(BugMasterError::Report {
                message: format!("{url} returned {status}"),
                source: None,
            });
        }
        if !status.is_success() {
            debug!(url, status = %status, "artifact not available");
            self.cache.insert(url, None);
            return Ok(None);
        }

        let body = response.text().await.map_err(|e| BugMasterError::Report {
            message: format!("failed to read {url}: {e}"),
            source: Some(Box::new(e)),
        })?;
        self.cache.insert(url, Some(body.clone()));
        Ok(Some(body))
    }
}

/// Join `path` onto `base`, treating `base` as a directory.
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> ArtifactClient {
        ArtifactClient::new(Duration::from_secs(5), Duration::from_secs(60)).unwrap()
    }

    #[test]
    fn join_url_normalises_slashes() {
        assert_eq!(join_url("https://s/logs/", "/job/1"), "https://s/logs/job/1");
        assert_eq!(join_url("https://s/logs", "job/1/"), "https://s/logs/job/1/");
    }

    #[tokio::test]
    async fn fetch_is_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/logs/build-log.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("error: boom"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client();
        let url = format!("{}/logs/build-log.txt", server.uri());
        assert_eq!(client.fetch(&url).await.unwrap().as_deref(), Some("error: boom"));
        assert_eq!(client.fetch(&url).await.unwrap().as_deref(), Some("error: boom"));
    }

    #[tokio::test]
    async fn not_found_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let url = format!("{}/missing.txt", server.uri());
        assert_eq!(client().fetch(&url).await.unwrap(), None);
    }

    #[tokio::test]
    async fn server_error_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let url = format!("{}/prowjob.json", server.uri());
        let err = client().fetch(&url).await.unwrap_err();
        assert!(matches!(err, BugMasterError::Report { .. }));
    }
}
