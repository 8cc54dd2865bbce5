// SPDX-FileCopyrightText: 2026 BugMaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The event handler trait.

use async_trait::async_trait;
use bugmaster_core::{BugMasterError, HandlerResponse};

use crate::context::EventContext;

/// One inbound delivery, bound to its payload at construction.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Process the delivery. Errors are answered with a 500 by the gateway.
    async fn handle(&self, ctx: &EventContext) -> Result<HandlerResponse, BugMasterError>;
}
