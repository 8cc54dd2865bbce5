// SPDX-FileCopyrightText: 2026 BugMaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed view of a Prow `prowjob.json` document.

use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

const LABEL_ORG: &str = "prow.k8s.io/refs.org";
const LABEL_REPO: &str = "prow.k8s.io/refs.repo";
const LABEL_BRANCH: &str = "prow.k8s.io/refs.base_ref";
const LABEL_BUILD_ID: &str = "prow.k8s.io/build-id";

#[derive(Debug, Default, Deserialize)]
struct ProwJobDocument {
    #[serde(default)]
    metadata: Metadata,
    #[serde(default)]
    spec: JobSpec,
}

#[derive(Debug, Default, Deserialize)]
struct Metadata {
    #[serde(default)]
    labels: HashMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
struct JobSpec {
    #[serde(default)]
    job: Option<String>,
    #[serde(default)]
    pod_spec: Option<PodSpec>,
}

#[derive(Debug, Default, Deserialize)]
struct PodSpec {
    #[serde(default)]
    containers: Vec<Container>,
}

#[derive(Debug, Default, Deserialize)]
struct Container {
    #[serde(default)]
    args: Vec<String>,
}

/// Identity of one Prow job run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProwResource {
    pub full_name: String,
    pub build_id: String,
    pub org: String,
    pub repo: String,
    pub branch: String,
    pub variant: String,
    name: String,
}

/// Why a `prowjob.json` document could not be turned into a [`ProwResource`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceError {
    #[error("malformed prowjob.json: {0}")]
    Malformed(String),
    #[error("prowjob.json has no spec.job")]
    MissingJob,
    #[error("prowjob.json has no build id label")]
    MissingBuildId,
}

impl ProwResource {
    /// Parse the raw `prowjob.json` content.
    pub fn parse(content: &str) -> Result<Self, ResourceError> {
        let doc: ProwJobDocument =
            serde_json::from_str(content).map_err(|e| ResourceError::Malformed(e.to_string()))?;

        let full_name = doc
            .spec
            .job
            .filter(|j| !j.is_empty())
            .ok_or(ResourceError::MissingJob)?;
        let label = |key: &str| doc.metadata.labels.get(key).cloned().unwrap_or_default();
        let build_id = label(LABEL_BUILD_ID);
        if build_id.is_empty() {
            return Err(ResourceError::MissingBuildId);
        }

        let variant = doc
            .spec
            .pod_spec
            .and_then(|p| p.containers.into_iter().next())
            .map(|c| variant_from_args(&c.args))
            .unwrap_or_default();

        Ok(Self::new(
            full_name,
            build_id,
            label(LABEL_ORG),
            label(LABEL_REPO),
            label(LABEL_BRANCH),
            variant,
        ))
    }

    pub fn new(
        full_name: String,
        build_id: String,
        org: String,
        repo: String,
        branch: String,
        variant: String,
    ) -> Self {
        let name = short_name(&full_name, &org, &repo, &branch, &variant);
        Self {
            full_name,
            build_id,
            org,
            repo,
            branch,
            variant,
            name,
        }
    }

    /// Job name without the `periodic-ci-{org}-{repo}-{branch}-[{variant}-]` prefix.
    pub fn name(&self) -> &str {
        &self.name
    }
}

fn variant_from_args(args: &[String]) -> String {
    args.iter()
        .filter_map(|arg| arg.trim_start_matches("--").split_once('='))
        .find(|(key, _)| *key == "variant")
        .map(|(_, value)| value.to_string())
        .unwrap_or_default()
}

fn short_name(full_name: &str, org: &str, repo: &str, branch: &str, variant: &str) -> String {
    let mut prefix = format!("periodic-ci-{org}-{repo}-{branch}-");
    if !variant.is_empty() {
        prefix.push_str(variant);
        prefix.push('-');
    }
    full_name.replace(&prefix, "")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROWJOB: &str = r#"{
        "metadata": {
            "labels": {
                "prow.k8s.io/refs.org": "openshift",
                "prow.k8s.io/refs.repo": "assisted-test-infra",
                "prow.k8s.io/refs.base_ref": "master",
                "prow.k8s.io/build-id": "1600000000000000001"
            }
        },
        "spec": {
            "job": "periodic-ci-openshift-assisted-test-infra-master-e2e-metal-assisted",
            "pod_spec": {
                "containers": [
                    {"args": ["--target=e2e-metal-assisted", "--report-credentials-file=/x"]}
                ]
            }
        }
    }"#;

    #[test]
    fn parses_labels_and_strips_prefix() {
        let resource = ProwResource::parse(PROWJOB).unwrap();
        assert_eq!(resource.build_id, "1600000000000000001");
        assert_eq!(resource.org, "openshift");
        assert_eq!(resource.branch, "master");
        assert_eq!(resource.variant, "");
        assert_eq!(resource.name(), "e2e-metal-assisted");
    }

    #[test]
    fn variant_is_part_of_the_stripped_prefix() {
        let content = PROWJOB
            .replace(
                "periodic-ci-openshift-assisted-test-infra-master-e2e",
                "periodic-ci-openshift-assisted-test-infra-master-nightly-4.14-e2e",
            )
            .replace("--target=e2e-metal-assisted", "--variant=nightly-4.14");
        let resource = ProwResource::parse(&content).unwrap();
        assert_eq!(resource.variant, "nightly-4.14");
        assert_eq!(resource.name(), "e2e-metal-assisted");
    }

    #[test]
    fn non_periodic_job_keeps_full_name() {
        let resource = ProwResource::new(
            "pull-ci-openshift-installer-master-unit".into(),
            "7".into(),
            "openshift".into(),
            "installer".into(),
            "master".into(),
            String::new(),
        );
        assert_eq!(resource.name(), "pull-ci-openshift-installer-master-unit");
    }

    #[test]
    fn missing_fields_are_reported() {
        assert!(matches!(
            ProwResource::parse("{not json"),
            Err(ResourceError::Malformed(_))
        ));
        assert_eq!(
            ProwResource::parse(r#"{"spec": {}}"#),
            Err(ResourceError::MissingJob)
        );
        assert_eq!(
            ProwResource::parse(r#"{"spec": {"job": "x"}}"#),
            Err(ResourceError::MissingBuildId)
        );
    }
}
