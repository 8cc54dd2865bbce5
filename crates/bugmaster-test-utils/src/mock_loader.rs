// SPDX-FileCopyrightText: 2026 BugMaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock report loader with per-URL scripted outcomes.

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::Mutex;

use bugmaster_core::{
    BugMasterError, ChannelConfiguration, FailureActions, FailureReport, LoadError, ReportLoader,
};

/// What `get_failure_actions` yields for a [`MockReport`].
#[derive(Debug, Clone)]
pub enum ScriptedActions {
    Actions(FailureActions),
    Skip(String),
    Fault(String),
}

/// A canned failure report.
#[derive(Debug, Clone)]
pub struct MockReport {
    build_id: String,
    job_name: String,
    url: String,
    actions: ScriptedActions,
}

impl MockReport {
    /// A report producing no reactions or comments.
    pub fn new(build_id: &str, job_name: &str, url: &str) -> Self {
        Self {
            build_id: build_id.to_string(),
            job_name: job_name.to_string(),
            url: url.to_string(),
            actions: ScriptedActions::Actions(FailureActions::default()),
        }
    }

    pub fn with_actions(mut self, actions: FailureActions) -> Self {
        self.actions = ScriptedActions::Actions(actions);
        self
    }

    pub fn with_scripted_actions(mut self, actions: ScriptedActions) -> Self {
        self.actions = actions;
        self
    }
}

#[async_trait]
impl FailureReport for MockReport {
    fn build_id(&self) -> &str {
        &self.build_id
    }

    fn job_name(&self) -> &str {
        &self.job_name
    }

    fn url(&self) -> &str {
        &self.url
    }

    async fn get_failure_actions(
        &self,
        _channel: &str,
        _configuration: &ChannelConfiguration,
    ) -> Result<FailureActions, LoadError> {
        match &self.actions {
            ScriptedActions::Actions(actions) => Ok(actions.clone()),
            ScriptedActions::Skip(reason) => Err(LoadError::skip(reason.clone())),
            ScriptedActions::Fault(message) => Err(LoadError::Fault(BugMasterError::Report {
                message: message.clone(),
                source: None,
            })),
        }
    }
}

/// What `load` yields for a URL.
#[derive(Debug, Clone)]
pub enum ScriptedLoad {
    Report(MockReport),
    Skip(String),
    Fault(String),
}

/// A mock report loader. Unscripted URLs are skipped.
pub struct MockLoader {
    outcomes: DashMap<String, ScriptedLoad>,
    loaded: Mutex<Vec<String>>,
}

impl MockLoader {
    pub fn new() -> Self {
        Self {
            outcomes: DashMap::new(),
            loaded: Mutex::new(Vec::new()),
        }
    }

    /// Serve `report` for its own URL.
    pub fn add_report(&self, report: MockReport) {
        self.outcomes
            .insert(report.url.clone(), ScriptedLoad::Report(report));
    }

    pub fn script(&self, url: &str, outcome: ScriptedLoad) {
        self.outcomes.insert(url.to_string(), outcome);
    }

    /// URLs passed to `load`, in call order.
    pub async fn loaded_urls(&self) -> Vec<String> {
        self.loaded.lock().await.clone()
    }
}

impl Default for MockLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReportLoader for MockLoader {
    async fn load(&self, url: &str) -> Result<Box<dyn FailureReport>, LoadError> {
        self.loaded.lock().await.push(url.to_string());
        let outcome = self.outcomes.get(url).map(|o| o.value().clone());
        match outcome {
            Some(ScriptedLoad::Report(report)) => Ok(Box::new(report)),
            Some(ScriptedLoad::Skip(reason)) => Err(LoadError::skip(reason)),
            Some(ScriptedLoad::Fault(message)) => Err(LoadError::Fault(BugMasterError::Report {
                message,
                source: None,
            })),
            None => Err(LoadError::skip(format!("no report scripted for {url}"))),
        }
    }
}
