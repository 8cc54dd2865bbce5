// SPDX-FileCopyrightText: 2026 BugMaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! BugMaster - a Slack bot that triages CI job failures.
//!
//! This is the binary entry point.

mod check_config;
mod serve;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// BugMaster - a Slack bot that triages CI job failures.
#[derive(Parser, Debug)]
#[command(name = "bugmaster", version, about, long_about = None)]
struct Cli {
    /// Configuration file to load instead of the XDG search path.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the webhook server (default).
    Serve,
    /// Validate the configuration and report on its collaborators.
    CheckConfig {
        /// Also validate a channel configuration file.
        #[arg(long)]
        channel_file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => bugmaster_config::load_and_validate_path(path),
        None => bugmaster_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            bugmaster_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve::run_serve(config).await,
        Commands::CheckConfig { channel_file } => {
            check_config::run_check_config(&config, channel_file.as_deref()).await
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
