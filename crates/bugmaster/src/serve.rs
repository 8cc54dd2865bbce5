// SPDX-FileCopyrightText: 2026 BugMaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `bugmaster serve` command implementation.
//!
//! Opens the audit database, connects to Slack, builds the Prow report
//! loader and serves the webhook gateway until SIGINT/SIGTERM.

use std::sync::Arc;
use std::time::Duration;

use bugmaster_config::model::BugMasterConfig;
use bugmaster_core::{BugMasterError, PluginAdapter};
use bugmaster_events::{EventContext, HandlerSettings};
use bugmaster_gateway::{AuthConfig, GatewayState, ServerConfig, start_server};
use bugmaster_prow::ProwLoader;
use bugmaster_slack::SlackBot;
use bugmaster_storage::SqliteStorage;
use tracing::{info, warn};

use crate::shutdown;

/// Runs the `bugmaster serve` command.
pub async fn run_serve(config: BugMasterConfig) -> Result<(), BugMasterError> {
    init_tracing(&config.bot.log_level);

    info!(bot = %config.bot.name, "starting bugmaster serve");

    let storage = {
        let storage = SqliteStorage::new(config.storage.clone());
        storage.initialize().await?;
        Arc::new(storage)
    };
    info!(path = %config.storage.database_path, "audit storage ready");

    let bot = Arc::new(SlackBot::connect(config.slack.clone()).await?);
    info!(
        bot_id = %bot.identity().bot_id,
        user_id = %bot.identity().user_id,
        "connected to slack"
    );

    let loader = Arc::new(ProwLoader::new(config.prow.clone())?);

    if config.slack.signing_secret.is_none() {
        warn!("slack.signing_secret is not set -- inbound requests will not be verified");
    }

    let ctx = EventContext::new(
        bot.clone(),
        loader.clone(),
        storage.clone(),
        HandlerSettings::from_config(&config),
    );
    let adapters: Vec<Arc<dyn PluginAdapter>> = vec![bot.clone(), storage.clone(), loader];
    let state = GatewayState::new(ctx, adapters.clone());

    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        request_timeout: Duration::from_secs(config.server.request_timeout_secs),
        auth: AuthConfig {
            signing_secret: config.slack.signing_secret.clone(),
        },
    };

    let cancel = shutdown::install_signal_handler();
    let served = start_server(&server_config, state, cancel).await;

    for adapter in &adapters {
        if let Err(e) = adapter.shutdown().await {
            warn!(adapter = adapter.name(), error = %e, "adapter shutdown failed");
        }
    }

    served?;
    info!("bugmaster serve shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("bugmaster={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
