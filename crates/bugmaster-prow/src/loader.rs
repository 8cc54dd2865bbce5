// SPDX-FileCopyrightText: 2026 BugMaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! ReportLoader implementation backed by Prow job artifacts.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bugmaster_config::model::ProwConfig;
use bugmaster_core::{
    AdapterType, BugMasterError, FailureReport, HealthStatus, LoadError, PluginAdapter,
    ReportLoader,
};
use tracing::{debug, info};

use crate::client::{ArtifactClient, join_url};
use crate::failure::ProwJobFailure;
use crate::resource::ProwResource;

const PROWJOB_FILE: &str = "prowjob.json";

/// Loads [`ProwJobFailure`]s from report page links.
pub struct ProwLoader {
    config: ProwConfig,
    client: Arc<ArtifactClient>,
}

impl ProwLoader {
    pub fn new(config: ProwConfig) -> Result<Self, BugMasterError> {
        let client = ArtifactClient::new(
            Duration::from_secs(config.request_timeout_secs),
            Duration::from_secs(config.cache_ttl_secs),
        )?;
        Ok(Self {
            config,
            client: Arc::new(client),
        })
    }

    /// Storage directory mirroring the report page at `url`.
    fn storage_dir_for(&self, url: &str) -> Option<String> {
        let job_path = url.strip_prefix(self.config.main_page_url.as_str())?;
        Some(join_url(&self.config.base_storage_url, job_path))
    }

    async fn load_prow(&self, url: &str) -> Result<ProwJobFailure, LoadError> {
        let storage_dir = self
            .storage_dir_for(url)
            .ok_or_else(|| LoadError::skip(format!("{url} is not a Prow job page")))?;

        let content = self
            .client
            .fetch(&join_url(&storage_dir, PROWJOB_FILE))
            .await?
            .ok_or_else(|| LoadError::skip(format!("{PROWJOB_FILE} not found for {url}")))?;
        if content.trim().is_empty() {
            return Err(LoadError::skip(format!("{PROWJOB_FILE} is empty for {url}")));
        }

        let resource = ProwResource::parse(&content).map_err(|e| LoadError::skip(e.to_string()))?;
        let storage_link = format!(
            "{}/",
            join_url(
                &join_url(&self.config.base_storage_url, &resource.full_name),
                &resource.build_id,
            )
        );
        info!(
            job = %resource.full_name,
            build_id = %resource.build_id,
            "prow job loaded"
        );

        Ok(ProwJobFailure::new(
            url.to_string(),
            resource,
            storage_link,
            Arc::clone(&self.client),
        ))
    }
}

#[async_trait]
impl ReportLoader for ProwLoader {
    async fn load(&self, url: &str) -> Result<Box<dyn FailureReport>, LoadError> {
        debug!(url, "loading report");
        let failure = self.load_prow(url).await?;
        Ok(Box::new(failure))
    }
}

#[async_trait]
impl PluginAdapter for ProwLoader {
    fn name(&self) -> &str {
        "prow"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::ReportSource
    }

    async fn health_check(&self) -> Result<HealthStatus, BugMasterError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), BugMasterError> {
        Ok(())
    }
}
