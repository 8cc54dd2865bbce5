// SPDX-FileCopyrightText: 2026 BugMaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `config`: summarise the channel's loaded configuration.

use async_trait::async_trait;
use bugmaster_core::types::{ActionRule, CommandReply};
use bugmaster_core::{BugMasterError, ChannelConfiguration};
use tracing::debug;

use super::{Command, CommandRequest};
use crate::context::EventContext;
use crate::message::missing_configuration_text;

pub const DESCRIPTION: &str = "Show the configuration loaded for this channel.";

pub struct ChannelConfigurationCommand {
    channel: String,
    channel_name: Option<String>,
}

impl ChannelConfigurationCommand {
    pub fn new(request: &CommandRequest) -> Self {
        Self {
            channel: request.channel_id.clone(),
            channel_name: request.channel_name.clone(),
        }
    }
}

fn describe_action(index: usize, action: &ActionRule) -> String {
    let mut parts = Vec::new();
    if let Some(job_name) = &action.job_name {
        parts.push(format!("job `{job_name}*`"));
    }
    for condition in action.effective_conditions() {
        if !condition.file_path.is_empty() {
            parts.push(format!(
                "`{}` contains `{}`",
                condition.file_path, condition.contains
            ));
        }
    }
    let mut outcome = Vec::new();
    if let Some(emoji) = &action.emoji {
        outcome.push(format!(":{}:", emoji.trim_matches(':')));
    }
    if let Some(assignees) = &action.assignees {
        outcome.push(format!("assign {}", assignees.users.join(", ")));
    }

    let id = action.action_id.as_deref().unwrap_or("-");
    let mut line = format!("{}. `{id}` {}", index + 1, action.description);
    line.push_str(&format!(" | when {}", parts.join(" or ")));
    if !outcome.is_empty() {
        line.push_str(&format!(" | {}", outcome.join(", ")));
    }
    if action.ignore_others {
        line.push_str(" | ignore others");
    }
    line
}

/// Render a configuration as a short list of rules.
pub fn describe_configuration(configuration: &ChannelConfiguration) -> String {
    if configuration.actions.is_empty() {
        return "The configuration has no actions.".to_string();
    }
    let mut text = format!("{} action(s):", configuration.actions.len());
    for (i, action) in configuration.actions.iter().enumerate() {
        text.push('\n');
        text.push_str(&describe_action(i, action));
    }
    if configuration.disable_auto_assign {
        text.push_str("\nAutomatic assignment is disabled for this channel.");
    }
    text
}

#[async_trait]
impl Command for ChannelConfigurationCommand {
    async fn handle(&self, ctx: &EventContext) -> Result<CommandReply, BugMasterError> {
        if !ctx.bot.has_channel_configurations(&self.channel) {
            ctx.bot
                .try_load_configurations_from_history(&self.channel)
                .await;
        }
        let Some(configuration) = ctx.bot.get_configuration(&self.channel) else {
            debug!(channel = %self.channel, "no configuration to show");
            let name = self.channel_name.as_deref().unwrap_or(&self.channel);
            return Ok(CommandReply::ephemeral(missing_configuration_text(name)));
        };
        Ok(CommandReply::ephemeral(describe_configuration(&configuration)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bugmaster_core::types::{Assignees, Condition};

    #[test]
    fn describes_rules() {
        let configuration = ChannelConfiguration {
            disable_auto_assign: true,
            actions: vec![
                ActionRule {
                    description: "metal jobs".into(),
                    action_id: Some("metal".into()),
                    emoji: Some(":metal:".into()),
                    job_name: Some("e2e-metal".into()),
                    ..Default::default()
                },
                ActionRule {
                    description: "network".into(),
                    emoji: Some("network".into()),
                    conditions: vec![Condition {
                        contains: "i/o timeout".into(),
                        file_path: "build-log.txt".into(),
                    }],
                    assignees: Some(Assignees {
                        users: vec!["alice".into()],
                        ..Default::default()
                    }),
                    ignore_others: true,
                    ..Default::default()
                },
            ],
        };
        let text = describe_configuration(&configuration);
        assert!(text.starts_with("2 action(s):"));
        assert!(text.contains("1. `metal` metal jobs | when job `e2e-metal*` | :metal:"));
        assert!(text.contains("`build-log.txt` contains `i/o timeout`"));
        assert!(text.contains("assign alice"));
        assert!(text.contains("ignore others"));
        assert!(text.ends_with("disabled for this channel."));
    }

    #[test]
    fn empty_configuration() {
        assert_eq!(
            describe_configuration(&ChannelConfiguration::default()),
            "The configuration has no actions."
        );
    }
}
