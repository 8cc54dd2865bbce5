// SPDX-FileCopyrightText: 2026 BugMaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parsing of per-channel configuration files.
//!
//! Channels are configured by uploading a TOML file to the channel itself:
//!
//! ```toml
//! disable_auto_assign = false
//!
//! [[actions]]
//! description = "infra flake"
//! action_id = "infra"
//! emoji = "cloud"
//! text = "Looks like an infrastructure issue"
//! contains = "connection reset by peer"
//! file_path = "build-log.txt"
//!
//! [actions.assignees]
//! users = ["oncall"]
//! ```

use bugmaster_core::ChannelConfiguration;

use crate::diagnostic::ConfigError;

/// Parse and validate a channel configuration file.
pub fn parse_channel_config(content: &str) -> Result<ChannelConfiguration, ConfigError> {
    let config: ChannelConfiguration =
        toml::from_str(content).map_err(|e| ConfigError::ChannelFile {
            message: e.message().to_string(),
        })?;
    validate_channel_config(&config)?;
    Ok(config)
}

fn validate_channel_config(config: &ChannelConfiguration) -> Result<(), ConfigError> {
    for (i, action) in config.actions.iter().enumerate() {
        let label = action
            .action_id
            .clone()
            .unwrap_or_else(|| format!("actions[{i}]"));

        if action.emoji.is_none() && action.text.is_none() {
            return Err(ConfigError::ChannelFile {
                message: format!("{label} needs an `emoji` or a `text`"),
            });
        }

        let has_file_condition = action
            .effective_conditions()
            .iter()
            .any(|c| !c.file_path.is_empty());
        if action.job_name.is_none() && !has_file_condition {
            return Err(ConfigError::ChannelFile {
                message: format!("{label} needs a `job_name` or a `file_path` condition"),
            });
        }

        if let Some(assignees) = &action.assignees
            && assignees.users.is_empty()
        {
            return Err(ConfigError::ChannelFile {
                message: format!("{label} has an `assignees` table without users"),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_actions_with_conditions_and_assignees() {
        let content = r#"
disable_auto_assign = true

[[actions]]
description = "network"
action_id = "net"
emoji = "network"
text = "network flake"
ignore_others = true

[[actions.conditions]]
contains = "i/o timeout"
file_path = "build-log.txt"

[[actions.conditions]]
contains = "connection refused"
file_path = "artifacts/{job_name}/log.txt"

[actions.assignees]
users = ["alice", "bob"]
issue_url = "https://issues.example.com/1"
"#;
        let config = parse_channel_config(content).unwrap();
        assert!(config.disable_auto_assign);
        assert_eq!(config.actions.len(), 1);
        let action = &config.actions[0];
        assert!(action.ignore_others);
        assert_eq!(action.conditions.len(), 2);
        let assignees = action.assignees.as_ref().unwrap();
        assert_eq!(assignees.users, vec!["alice", "bob"]);
    }

    #[test]
    fn job_name_rule_needs_no_file() {
        let content = r#"
[[actions]]
emoji = "skull"
job_name = "e2e-metal"
"#;
        let config = parse_channel_config(content).unwrap();
        assert_eq!(config.actions[0].job_name.as_deref(), Some("e2e-metal"));
    }

    #[test]
    fn rejects_action_without_outcome() {
        let content = r#"
[[actions]]
contains = "x"
file_path = "build-log.txt"
"#;
        let err = parse_channel_config(content).unwrap_err();
        assert!(err.to_string().contains("emoji"));
    }

    #[test]
    fn rejects_action_without_trigger() {
        let content = r#"
[[actions]]
action_id = "lonely"
emoji = "ghost"
"#;
        let err = parse_channel_config(content).unwrap_err();
        assert!(err.to_string().contains("lonely"));
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = parse_channel_config("[[actions]]\nemojii = \"x\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ChannelFile { .. }));
    }

    #[test]
    fn empty_file_is_an_empty_configuration() {
        let config = parse_channel_config("").unwrap();
        assert!(config.actions.is_empty());
    }
}
