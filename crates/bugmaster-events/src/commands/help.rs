// SPDX-FileCopyrightText: 2026 BugMaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use async_trait::async_trait;
use bugmaster_core::BugMasterError;
use bugmaster_core::types::CommandReply;

use super::{Command, CommandRequest, supported_commands};
use crate::context::EventContext;

pub const DESCRIPTION: &str = "Show this help message.";

pub struct HelpCommand {
    prefix: String,
}

impl HelpCommand {
    pub fn new(request: &CommandRequest) -> Self {
        Self {
            prefix: request.command.clone(),
        }
    }
}

#[async_trait]
impl Command for HelpCommand {
    async fn handle(&self, ctx: &EventContext) -> Result<CommandReply, BugMasterError> {
        let prefix = if self.prefix.is_empty() {
            ctx.settings.command_prefix.as_str()
        } else {
            self.prefix.as_str()
        };
        let lines: Vec<String> = supported_commands()
            .map(|(keyword, description)| format!("`{prefix} {keyword}` - {description}"))
            .collect();
        Ok(CommandReply::ephemeral(format!(
            "Available commands:\n{}",
            lines.join("\n")
        )))
    }
}
