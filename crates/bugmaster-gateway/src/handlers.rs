// SPDX-FileCopyrightText: 2026 BugMaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the Slack webhooks.
//!
//! Handles POST /slack/events, POST /slack/commands and GET /health.

use axum::{
    Form, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use bugmaster_core::{BugMasterError, EventEnvelope, HandlerResponse, HealthStatus};
use bugmaster_events::{CommandRequest, dispatch_command, dispatch_event};

use crate::server::GatewayState;

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "healthy" when every adapter is healthy, else "degraded".
    pub status: String,
    /// Binary version.
    pub version: String,
    /// Seconds since the server started.
    pub uptime_secs: u64,
    pub adapters: Vec<AdapterHealth>,
}

#[derive(Debug, Serialize)]
pub struct AdapterHealth {
    pub name: String,
    pub status: String,
}

/// Render a handler acknowledgment with its code as the HTTP status.
fn acknowledgment(response: HandlerResponse) -> Response {
    let status = StatusCode::from_u16(response.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(response)).into_response()
}

fn internal_error() -> Response {
    acknowledgment(HandlerResponse::failure(500))
}

/// POST /slack/events
///
/// Resolves the handler for the delivery and runs it to completion.
/// Deliveries nobody handles are acknowledged so Slack does not retry them.
pub async fn post_events(
    State(state): State<GatewayState>,
    Json(envelope): Json<EventEnvelope>,
) -> Response {
    match dispatch_event(&state.ctx, &envelope).await {
        Ok(response) => acknowledgment(response),
        Err(BugMasterError::NotSupportedEvent {
            event_type,
            subtype,
        }) => {
            tracing::debug!(%event_type, %subtype, "ignoring unsupported event");
            acknowledgment(HandlerResponse::success())
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                event_id = ?envelope.event_id,
                "event handling failed"
            );
            internal_error()
        }
    }
}

/// POST /slack/commands
pub async fn post_commands(
    State(state): State<GatewayState>,
    Form(request): Form<CommandRequest>,
) -> Response {
    match dispatch_command(&state.ctx, &request).await {
        Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
        Err(e) => {
            tracing::error!(
                error = %e,
                channel = %request.channel_id,
                text = %request.text,
                "command handling failed"
            );
            internal_error()
        }
    }
}

/// GET /health
///
/// Unauthenticated. Runs every adapter's health check.
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    let mut healthy = true;
    let mut adapters = Vec::with_capacity(state.health.adapters.len());
    for adapter in &state.health.adapters {
        let status = match adapter.health_check().await {
            Ok(HealthStatus::Healthy) => "healthy".to_string(),
            Ok(HealthStatus::Degraded(reason)) => {
                healthy = false;
                format!("degraded: {reason}")
            }
            Ok(HealthStatus::Unhealthy(reason)) => {
                healthy = false;
                format!("unhealthy: {reason}")
            }
            Err(e) => {
                healthy = false;
                format!("unhealthy: {e}")
            }
        };
        adapters.push(AdapterHealth {
            name: adapter.name().to_string(),
            status,
        });
    }

    Json(HealthResponse {
        status: if healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.health.start_time.elapsed().as_secs(),
        adapters,
    })
}
