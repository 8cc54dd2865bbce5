// SPDX-FileCopyrightText: 2026 BugMaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Events API endpoint verification handshake.

use async_trait::async_trait;
use bugmaster_core::{BugMasterError, EventEnvelope, HandlerResponse};
use tracing::{info, warn};

use crate::context::EventContext;
use crate::handler::EventHandler;

pub struct UrlVerificationEvent {
    challenge: Option<String>,
}

impl UrlVerificationEvent {
    pub fn new(envelope: &EventEnvelope) -> Self {
        Self {
            challenge: envelope.challenge.clone(),
        }
    }
}

#[async_trait]
impl EventHandler for UrlVerificationEvent {
    fn name(&self) -> &'static str {
        "url_verification"
    }

    async fn handle(&self, _ctx: &EventContext) -> Result<HandlerResponse, BugMasterError> {
        match &self.challenge {
            Some(challenge) => {
                info!("answering url verification challenge");
                Ok(HandlerResponse::challenge(challenge.clone()))
            }
            None => {
                warn!("url verification without challenge");
                Ok(HandlerResponse::failure(400))
            }
        }
    }
}
