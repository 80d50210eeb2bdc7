//! Pingbot - a minimal XMPP bot that answers `ping <host>`.
//!
//! Connects with the account from the config file, answers `ping` commands
//! with the output of the system `ping`, and exits when the session ends or
//! on Ctrl-C.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use pingbot_config::Config;
use pingbot_core::bot;

pub mod config_bridge;

/// How long shutdown waits for the stream to be closed cleanly.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Pingbot - XMPP ping bot
#[derive(Parser)]
#[command(name = "pingbot")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log at debug level and trace every stanza
    #[arg(short, long)]
    debug: bool,

    /// Path to the configuration file [default: ./config.toml, then the user config directory]
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let resolved = match Config::load(cli.config.as_deref()) {
        Ok(resolved) => resolved,
        Err(e) => {
            // No config means no logging config either; report on the defaults.
            let level = if cli.debug { "debug" } else { "info" };
            let fallback = pingbot_telemetry::LogConfig::new(level)
                .with_format(pingbot_telemetry::LogFormat::Compact);
            if let Err(log_err) = pingbot_telemetry::setup_logging(&fallback) {
                eprintln!("Failed to initialize logging: {log_err}");
            }
            error!(error = %e, "cannot load configuration");
            return Err(e.into());
        },
    };

    let log_config = config_bridge::to_log_config(&resolved.config, cli.debug);
    if let Err(e) = pingbot_telemetry::setup_logging(&log_config) {
        eprintln!("Failed to initialize logging: {e}");
    }
    if let Some(path) = &resolved.source {
        info!(path = %path.display(), env_applied = resolved.env_applied, "configuration loaded");
    }

    let params = config_bridge::to_session_params(&resolved.config)?;
    let processor = config_bridge::to_processor(&resolved.config);
    let connector = config_bridge::to_connector(&resolved.config);

    // Dropping the loop on Ctrl-C drops the session, which closes it.
    let outcome: Result<()> = tokio::select! {
        result = bot::run(&connector, params, &processor) => {
            match result {
                Ok(exit) => {
                    info!(?exit, "bot stopped");
                    Ok(())
                },
                Err(e) => {
                    error!(error = %e, "could not establish session");
                    Err(e.into())
                },
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("interrupted, shutting down");
            Ok(())
        }
    };

    connector.finish(SHUTDOWN_GRACE).await;
    outcome
}
