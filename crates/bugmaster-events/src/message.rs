// SPDX-FileCopyrightText: 2026 BugMaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Handler for plain channel messages carrying CI failure notifications.
//!
//! A message is processed only when it was not posted by the bot itself and
//! its text starts with the failure prefix. Each report link is then loaded
//! and annotated in turn: reactions first, comments in [`CommentType`]
//! order, then one audit record per link.
//!
//! [`CommentType`]: bugmaster_core::CommentType

use async_trait::async_trait;
use bugmaster_core::{
    BugMasterError, ChannelConfiguration, Comment, EventData, EventEnvelope, FailureReport,
    HandlerResponse, LoadError, MessageEventRecord, Upsert,
};
use tracing::{debug, info, warn};

use crate::context::EventContext;
use crate::handler::EventHandler;
use crate::links::extract_links;

/// Remediation posted when a channel has no usable configuration.
pub fn missing_configuration_text(channel_name: &str) -> String {
    format!(
        "BugMaster configuration file on channel `{channel_name}` is invalid or missing. \
         Please add or fix the configuration file or remove the bot."
    )
}

/// Whether `text`, with spaces removed, starts with `prefix`.
pub fn has_failure_prefix(text: &str, prefix: &str) -> bool {
    text.replace(' ', "").starts_with(prefix)
}

pub struct MessageChannelEvent {
    data: EventData,
}

impl MessageChannelEvent {
    pub fn new(envelope: &EventEnvelope) -> Self {
        Self::from_data(envelope.data())
    }

    pub fn from_data(data: EventData) -> Self {
        Self { data }
    }

    fn channel(&self) -> &str {
        self.data.channel()
    }

    fn ts(&self) -> Option<&str> {
        self.data.ts.as_deref()
    }

    fn is_self_event(&self, ctx: &EventContext) -> bool {
        self.data
            .bot_id
            .as_deref()
            .is_some_and(|id| id == ctx.bot.bot_id())
    }

    /// Apply reactions in list order. Failures are logged and skipped.
    async fn add_reactions(&self, ctx: &EventContext, emojis: &[String]) {
        let Some(ts) = self.ts() else {
            warn!(channel = %self.channel(), "message has no ts, skipping reactions");
            return;
        };
        for emoji in emojis {
            debug!(channel = %self.channel(), ts, emoji = %emoji, "adding reaction");
            if let Err(e) = ctx.bot.add_reaction(self.channel(), emoji, ts).await {
                warn!(
                    channel = %self.channel(),
                    emoji = %emoji,
                    error = %e,
                    "failed to add reaction"
                );
            }
        }
    }

    /// Post comments in ascending comment type, keeping discovery order within a type.
    async fn add_comments(
        &self,
        ctx: &EventContext,
        mut comments: Vec<Comment>,
    ) -> Result<(), BugMasterError> {
        comments.sort_by_key(|c| c.comment_type);
        for comment in &comments {
            debug!(
                channel = %self.channel(),
                ts = ?self.ts(),
                comment_type = %comment.comment_type,
                "adding comment"
            );
            ctx.bot
                .add_comment(self.channel(), &comment.text, self.ts(), comment.parse)
                .await?;
        }
        Ok(())
    }

    async fn add_record(&self, ctx: &EventContext, report: &dyn FailureReport) {
        let record = MessageEventRecord {
            job_id: report.build_id().to_string(),
            job_name: report.job_name().to_string(),
            user: self.data.user.clone(),
            thread_ts: self.data.ts.clone(),
            url: report.url().to_string(),
            channel_id: self.channel().to_string(),
            created_at: String::new(),
        };
        match ctx.store.create(record).await {
            Upsert::Created(r) => {
                info!(job_id = %r.job_id, job_name = %r.job_name, "audit record created");
            }
            Upsert::Found(r) => debug!(job_id = %r.job_id, "audit record already present"),
            Upsert::NotCreated => warn!(
                job_id = %report.build_id(),
                url = %report.url(),
                "audit record not created"
            ),
        }
    }

    async fn process_link(
        &self,
        ctx: &EventContext,
        configuration: &ChannelConfiguration,
        link: &str,
    ) -> Result<(), LoadError> {
        let report = ctx.loader.load(link).await?;
        let actions = report
            .get_failure_actions(self.channel(), configuration)
            .await?;
        debug!(
            url = %link,
            emojis = ?actions.emojis,
            comments = actions.comments.len(),
            "applying failure actions"
        );

        self.add_reactions(ctx, &actions.emojis).await;
        self.add_comments(ctx, actions.comments).await?;
        self.add_record(ctx, report.as_ref()).await;
        Ok(())
    }
}

#[async_trait]
impl EventHandler for MessageChannelEvent {
    fn name(&self) -> &'static str {
        "message"
    }

    async fn handle(&self, ctx: &EventContext) -> Result<HandlerResponse, BugMasterError> {
        if self.is_self_event(ctx) {
            info!(
                channel = %self.channel(),
                bot_id = %ctx.bot.bot_id(),
                bot = %ctx.bot.bot_name(),
                event = %self.data,
                "skipping event sent by the bot"
            );
            return Ok(HandlerResponse::success());
        }

        if !has_failure_prefix(self.data.text(), &ctx.settings.failure_prefix) {
            info!(
                channel = %self.channel(),
                prefix = %ctx.settings.failure_prefix,
                "ignoring message without failure prefix"
            );
            return Ok(HandlerResponse::success());
        }

        let channel = self.channel();
        if !ctx.bot.has_channel_configurations(channel) {
            ctx.bot.try_load_configurations_from_history(channel).await;
        }
        let Some(configuration) = ctx.bot.get_configuration(channel) else {
            let channel_name = ctx
                .bot
                .channel_name(channel)
                .await
                .unwrap_or_else(|| channel.to_string());
            warn!(channel, "channel configuration missing");
            ctx.bot
                .add_comment(channel, &missing_configuration_text(&channel_name), None, false)
                .await?;
            return Ok(HandlerResponse::failure(401));
        };

        info!(event = %self.data, "handling failure message");
        for link in extract_links(&self.data, &ctx.settings.link_host) {
            if !link.starts_with(ctx.settings.main_page_url.as_str()) {
                info!(url = %link, "skipping link outside the report host");
                continue;
            }
            match self.process_link(ctx, &configuration, &link).await {
                Ok(()) => {}
                Err(LoadError::Skip { reason }) => {
                    warn!(url = %link, reason = %reason, "skipping unparsable report");
                }
                Err(LoadError::Fault(e)) => return Err(e),
            }
        }

        Ok(HandlerResponse::success())
    }
}
