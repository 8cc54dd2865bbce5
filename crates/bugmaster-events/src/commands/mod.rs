// SPDX-FileCopyrightText: 2026 BugMaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slash command handling.
//!
//! A slash command arrives as `<prefix> <keyword> [args...]`; the keyword
//! selects a handler from a static table.

pub mod config;
pub mod help;
pub mod stats;

use async_trait::async_trait;
use bugmaster_core::BugMasterError;
use bugmaster_core::types::CommandReply;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::context::EventContext;

use self::config::ChannelConfigurationCommand;
use self::help::HelpCommand;
use self::stats::StatisticsCommand;

/// Form payload of a slash command invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRequest {
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub channel_id: String,
    #[serde(default)]
    pub channel_name: Option<String>,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub response_url: Option<String>,
}

impl CommandRequest {
    /// The keyword and its arguments. An empty command text means `help`.
    pub fn keyword_and_args(&self) -> (String, Vec<String>) {
        let mut words = self.text.split_whitespace().map(str::to_string);
        let keyword = words
            .next()
            .map(|w| w.to_lowercase())
            .unwrap_or_else(|| HELP_COMMAND.to_string());
        (keyword, words.collect())
    }
}

/// A parsed command bound to its request.
#[async_trait]
pub trait Command: Send + Sync {
    async fn handle(&self, ctx: &EventContext) -> Result<CommandReply, BugMasterError>;
}

pub const HELP_COMMAND: &str = "help";
pub const CONFIG_COMMAND: &str = "config";
pub const STATS_COMMAND: &str = "stats";

type Constructor = fn(&CommandRequest, Vec<String>) -> Box<dyn Command>;

fn help_command(request: &CommandRequest, _args: Vec<String>) -> Box<dyn Command> {
    Box::new(HelpCommand::new(request))
}

fn config_command(request: &CommandRequest, _args: Vec<String>) -> Box<dyn Command> {
    Box::new(ChannelConfigurationCommand::new(request))
}

fn stats_command(request: &CommandRequest, args: Vec<String>) -> Box<dyn Command> {
    Box::new(StatisticsCommand::new(request, args))
}

/// Keyword, description, constructor.
const SUPPORTED_COMMANDS: &[(&str, &str, Constructor)] = &[
    (HELP_COMMAND, help::DESCRIPTION, help_command),
    (CONFIG_COMMAND, config::DESCRIPTION, config_command),
    (STATS_COMMAND, stats::DESCRIPTION, stats_command),
];

/// `(keyword, description)` of every supported command.
pub fn supported_commands() -> impl Iterator<Item = (&'static str, &'static str)> {
    SUPPORTED_COMMANDS
        .iter()
        .map(|(keyword, description, _)| (*keyword, *description))
}

/// Build the command registered for the request's keyword.
pub fn get_command(request: &CommandRequest) -> Result<Box<dyn Command>, BugMasterError> {
    let (keyword, args) = request.keyword_and_args();
    SUPPORTED_COMMANDS
        .iter()
        .find(|(k, _, _)| *k == keyword)
        .map(|(_, _, constructor)| constructor(request, args))
        .ok_or(BugMasterError::NotSupportedCommand { command: keyword })
}

/// Resolve and run a slash command. Unknown keywords get a usage reply.
pub async fn dispatch_command(
    ctx: &EventContext,
    request: &CommandRequest,
) -> Result<CommandReply, BugMasterError> {
    info!(
        channel = %request.channel_id,
        user = %request.user_id,
        text = %request.text,
        "handling command"
    );
    match get_command(request) {
        Ok(command) => command.handle(ctx).await,
        Err(BugMasterError::NotSupportedCommand { command }) => {
            warn!(command = %command, "unsupported command");
            let keywords: Vec<&str> = supported_commands().map(|(k, _)| k).collect();
            Ok(CommandReply::ephemeral(format!(
                "Command `{command}` is not supported. Supported commands: {}.",
                keywords.join(", ")
            )))
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(text: &str) -> CommandRequest {
        CommandRequest {
            command: "/bugmaster".into(),
            text: text.into(),
            channel_id: "C1".into(),
            ..Default::default()
        }
    }

    #[test]
    fn splits_keyword_and_args() {
        let (keyword, args) = request("  Stats  7 extra").keyword_and_args();
        assert_eq!(keyword, "stats");
        assert_eq!(args, vec!["7", "extra"]);
    }

    #[test]
    fn empty_text_is_help() {
        let (keyword, args) = request("").keyword_and_args();
        assert_eq!(keyword, "help");
        assert!(args.is_empty());
    }

    #[test]
    fn unknown_keyword_is_not_supported() {
        let err = get_command(&request("deploy now")).err().unwrap();
        match err {
            BugMasterError::NotSupportedCommand { command } => assert_eq!(command, "deploy"),
            other => panic!("expected NotSupportedCommand, got {other:?}"),
        }
    }

    #[test]
    fn known_keywords_resolve() {
        for keyword in ["help", "config", "stats"] {
            assert!(get_command(&request(keyword)).is_ok(), "{keyword}");
        }
        assert_eq!(supported_commands().count(), 3);
    }
}
