// SPDX-FileCopyrightText: 2026 BugMaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    http::StatusCode,
    middleware as axum_middleware,
    routing::{get, post},
};
use bugmaster_core::{BugMasterError, PluginAdapter};
use bugmaster_events::EventContext;
use tokio_util::sync::CancellationToken;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{AuthConfig, signature_middleware};
use crate::handlers;

/// State for the unauthenticated health endpoint.
#[derive(Clone)]
pub struct HealthState {
    /// Process start time for uptime calculation.
    pub start_time: std::time::Instant,
    /// Adapters whose health checks are reported.
    pub adapters: Vec<Arc<dyn PluginAdapter>>,
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Collaborators handed to every event and command handler.
    pub ctx: EventContext,
    pub health: HealthState,
}

impl GatewayState {
    pub fn new(ctx: EventContext, adapters: Vec<Arc<dyn PluginAdapter>>) -> Self {
        Self {
            ctx,
            health: HealthState {
                start_time: std::time::Instant::now(),
                adapters,
            },
        }
    }
}

/// Gateway server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on handling one request.
    pub request_timeout: Duration,
    pub auth: AuthConfig,
}

/// Build the application router.
///
/// - POST /slack/events (signature verified)
/// - POST /slack/commands (signature verified)
/// - GET /health (unauthenticated)
pub fn router(config: &ServerConfig, state: GatewayState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .with_state(state.clone());

    let slack_routes = Router::new()
        .route("/slack/events", post(handlers::post_events))
        .route("/slack/commands", post(handlers::post_commands))
        .route_layer(axum_middleware::from_fn_with_state(
            config.auth.clone(),
            signature_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(slack_routes)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
}

/// Serve the gateway until `shutdown` is cancelled.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), BugMasterError> {
    let app = router(config, state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| BugMasterError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| BugMasterError::Internal(format!("gateway server error: {e}")))?;

    tracing::info!("Gateway server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_config_debug_redacts_secret() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            request_timeout: Duration::from_secs(30),
            auth: AuthConfig {
                signing_secret: Some("s3cret".to_string()),
            },
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("127.0.0.1"));
        assert!(!debug.contains("s3cret"));
    }
}
