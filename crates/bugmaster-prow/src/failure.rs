// SPDX-FileCopyrightText: 2026 BugMaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Evaluation of channel rules against one loaded Prow job.

use std::sync::Arc;

use async_trait::async_trait;
use bugmaster_core::types::{ActionRule, Assignees};
use bugmaster_core::{
    BugMasterError, ChannelConfiguration, Comment, CommentType, FailureActions, FailureReport,
    LoadError,
};
use tracing::{debug, info};

use crate::client::{ArtifactClient, join_url};
use crate::resource::ProwResource;

/// A failed Prow job whose artifacts live under `storage_link`.
pub struct ProwJobFailure {
    url: String,
    resource: ProwResource,
    storage_link: String,
    client: Arc<ArtifactClient>,
}

impl ProwJobFailure {
    pub fn new(
        url: String,
        resource: ProwResource,
        storage_link: String,
        client: Arc<ArtifactClient>,
    ) -> Self {
        Self {
            url,
            resource,
            storage_link,
            client,
        }
    }

    pub fn resource(&self) -> &ProwResource {
        &self.resource
    }

    pub fn storage_link(&self) -> &str {
        &self.storage_link
    }

    async fn rule_applies(&self, rule: &ActionRule) -> Result<bool, BugMasterError> {
        if let Some(prefix) = &rule.job_name
            && (self.resource.name().starts_with(prefix.as_str())
                || self.resource.full_name.starts_with(prefix.as_str()))
        {
            return Ok(true);
        }

        for condition in rule.effective_conditions() {
            if condition.file_path.is_empty() || condition.contains.is_empty() {
                continue;
            }
            if condition.file_path.ends_with('*') {
                debug!(file_path = %condition.file_path, "directory patterns are not evaluated");
                continue;
            }
            let file_path = condition
                .file_path
                .replace("{job_name}", self.resource.name());
            let url = join_url(&self.storage_link, &file_path);
            if let Some(content) = self.client.fetch(&url).await?
                && content.contains(&condition.contains)
            {
                debug!(url = %url, action_id = ?rule.action_id, "condition matched");
                return Ok(true);
            }
        }
        Ok(false)
    }
}

fn assignee_comments(assignees: &Assignees) -> Vec<Comment> {
    let users = assignees
        .users
        .iter()
        .map(|u| format!("@{u}"))
        .collect::<Vec<_>>()
        .join(" ");
    let mut comments = vec![Comment::new(
        format!("{users} You have been automatically assigned to investigate this job failure"),
        CommentType::Assignee,
        true,
    )];
    if let Some(issue_url) = &assignees.issue_url {
        comments.push(Comment::new(
            format!("See <{issue_url}|link> for more information"),
            CommentType::MoreInfo,
            false,
        ));
    }
    comments
}

#[async_trait]
impl FailureReport for ProwJobFailure {
    fn build_id(&self) -> &str {
        &self.resource.build_id
    }

    fn job_name(&self) -> &str {
        self.resource.name()
    }

    fn url(&self) -> &str {
        &self.url
    }

    async fn get_failure_actions(
        &self,
        channel: &str,
        configuration: &ChannelConfiguration,
    ) -> Result<FailureActions, LoadError> {
        let mut matched: Vec<&ActionRule> = Vec::new();
        for rule in &configuration.actions {
            if self.rule_applies(rule).await? {
                matched.push(rule);
            }
        }

        if matched.iter().any(|r| r.ignore_others) {
            matched.retain(|r| r.ignore_others);
        }

        if configuration.disable_auto_assign {
            info!(channel, "automatic assignment disabled for channel");
        }

        let mut actions = FailureActions::default();
        for rule in matched {
            if let Some(emoji) = &rule.emoji
                && !actions.emojis.contains(emoji)
            {
                actions.emojis.push(emoji.clone());
            }
            if let Some(text) = &rule.text {
                actions
                    .comments
                    .push(Comment::new(text.clone(), CommentType::ErrorInfo, true));
            }
            if let Some(assignees) = &rule.assignees
                && !assignees.disable_auto_assign
                && !configuration.disable_auto_assign
            {
                actions.comments.extend(assignee_comments(assignees));
            }
        }

        debug!(
            channel,
            job = %self.resource.full_name,
            emojis = actions.emojis.len(),
            comments = actions.comments.len(),
            "failure actions resolved"
        );
        Ok(actions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bugmaster_core::types::Condition;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn resource() -> ProwResource {
        ProwResource::new(
            "periodic-ci-openshift-assisted-master-e2e-metal".into(),
            "1001".into(),
            "openshift".into(),
            "assisted".into(),
            "master".into(),
            String::new(),
        )
    }

    fn failure(storage: &str) -> ProwJobFailure {
        let client =
            ArtifactClient::new(Duration::from_secs(5), Duration::from_secs(60)).unwrap();
        ProwJobFailure::new(
            "https://prow.example.com/view/job/1001".into(),
            resource(),
            storage.to_string(),
            Arc::new(client),
        )
    }

    fn file_rule(id: &str, contains: &str, file: &str) -> ActionRule {
        ActionRule {
            action_id: Some(id.into()),
            emoji: Some(format!("{id}-emoji")),
            text: Some(format!("{id} text")),
            contains: Some(contains.into()),
            file_path: Some(file.into()),
            ..Default::default()
        }
    }

    async fn storage_with_log(body: &str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/logs/build-log.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/logs/artifacts/e2e-metal/junit.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<failure>dns</failure>"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn job_name_prefix_matches_without_fetching() {
        let report = failure("http://127.0.0.1:1/unreachable/");
        let config = ChannelConfiguration {
            actions: vec![ActionRule {
                emoji: Some("metal".into()),
                job_name: Some("e2e-metal".into()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let actions = report.get_failure_actions("C1", &config).await.unwrap();
        assert_eq!(actions.emojis, vec!["metal"]);
        assert!(actions.comments.is_empty());
    }

    #[tokio::test]
    async fn file_condition_and_job_name_substitution() {
        let server = storage_with_log("level=error msg=\"connection reset by peer\"").await;
        let report = failure(&format!("{}/logs/", server.uri()));
        let config = ChannelConfiguration {
            actions: vec![
                file_rule("net", "connection reset", "build-log.txt"),
                file_rule("quota", "quota exceeded", "build-log.txt"),
                file_rule("dns", "dns", "artifacts/{job_name}/junit.xml"),
            ],
            ..Default::default()
        };

        let actions = report.get_failure_actions("C1", &config).await.unwrap();
        assert_eq!(actions.emojis, vec!["net-emoji", "dns-emoji"]);
        let texts: Vec<_> = actions.comments.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["net text", "dns text"]);
        assert!(actions.comments.iter().all(|c| c.comment_type == CommentType::ErrorInfo));
    }

    #[tokio::test]
    async fn ignore_others_keeps_only_flagged_rules() {
        let server = storage_with_log("timeout and connection reset").await;
        let report = failure(&format!("{}/logs", server.uri()));
        let mut exclusive = file_rule("exclusive", "timeout", "build-log.txt");
        exclusive.ignore_others = true;
        let config = ChannelConfiguration {
            actions: vec![file_rule("net", "connection reset", "build-log.txt"), exclusive],
            ..Default::default()
        };

        let actions = report.get_failure_actions("C1", &config).await.unwrap();
        assert_eq!(actions.emojis, vec!["exclusive-emoji"]);
    }

    #[tokio::test]
    async fn duplicate_emojis_are_collapsed() {
        let server = storage_with_log("timeout").await;
        let report = failure(&format!("{}/logs", server.uri()));
        let mut a = file_rule("a", "timeout", "build-log.txt");
        let mut b = file_rule("b", "timeout", "build-log.txt");
        a.emoji = Some("clock".into());
        b.emoji = Some("clock".into());
        let config = ChannelConfiguration {
            actions: vec![a, b],
            ..Default::default()
        };

        let actions = report.get_failure_actions("C1", &config).await.unwrap();
        assert_eq!(actions.emojis, vec!["clock"]);
        assert_eq!(actions.comments.len(), 2);
    }

    #[tokio::test]
    async fn assignees_add_mentions_and_issue_link() {
        let server = storage_with_log("panic: runtime error").await;
        let report = failure(&format!("{}/logs", server.uri()));
        let mut rule = file_rule("panic", "panic:", "build-log.txt");
        rule.assignees = Some(Assignees {
            users: vec!["alice".into(), "bob".into()],
            issue_url: Some("https://issues.example.com/42".into()),
            disable_auto_assign: false,
        });
        let config = ChannelConfiguration {
            actions: vec![rule.clone()],
            ..Default::default()
        };

        let actions = report.get_failure_actions("C1", &config).await.unwrap();
        let types: Vec<_> = actions.comments.iter().map(|c| c.comment_type).collect();
        assert_eq!(
            types,
            vec![CommentType::ErrorInfo, CommentType::Assignee, CommentType::MoreInfo]
        );
        assert!(actions.comments[1].text.starts_with("@alice @bob"));
        assert!(!actions.comments[2].parse);

        let disabled = ChannelConfiguration {
            disable_auto_assign: true,
            actions: vec![rule],
        };
        let actions = report.get_failure_actions("C1", &disabled).await.unwrap();
        assert_eq!(actions.comments.len(), 1);
    }

    #[tokio::test]
    async fn explicit_conditions_match_any() {
        let server = storage_with_log("OOMKilled").await;
        let report = failure(&format!("{}/logs", server.uri()));
        let rule = ActionRule {
            emoji: Some("boom".into()),
            conditions: vec![
                Condition {
                    contains: "nope".into(),
                    file_path: "build-log.txt".into(),
                },
                Condition {
                    contains: "OOMKilled".into(),
                    file_path: "build-log.txt".into(),
                },
            ],
            ..Default::default()
        };
        let config = ChannelConfiguration {
            actions: vec![rule],
            ..Default::default()
        };
        let actions = report.get_failure_actions("C1", &config).await.unwrap();
        assert_eq!(actions.emojis, vec!["boom"]);
    }

    #[tokio::test]
    async fn storage_outage_is_a_fault() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let report = failure(&format!("{}/logs", server.uri()));
        let config = ChannelConfiguration {
            actions: vec![file_rule("x", "y", "build-log.txt")],
            ..Default::default()
        };
        let err = report.get_failure_actions("C1", &config).await.unwrap_err();
        assert!(matches!(err, LoadError::Fault(_)));
    }
}
