//! spinctl
//!
//! Command-line maintenance tool for Spinnaker applications, talking to the
//! Gate API.
//!
//! Architecture:
//! - Commands: Parse arguments and print results
//! - Services: Business logic (bulk cleanup, pipeline copy)
//! - Repositories: HTTP communication with Gate

mod commands;
mod config;
mod repository;
mod service;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "spinctl")]
#[command(about = "Spinnaker pipeline maintenance CLI", long_about = None)]
struct Cli {
    /// Gate API URL
    #[arg(long, env = "SPINCTL_GATE_URL")]
    gate: String,

    /// Token sent in the authorization header
    #[arg(long, env = "SPINCTL_TOKEN", hide_env_values = true)]
    token: String,

    /// Abort the command after this many seconds
    #[arg(long, env = "SPINCTL_TIMEOUT")]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spinctl=info,spinctl_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        gate_url: cli.gate,
        token: cli.token,
        timeout: cli.timeout.map(Duration::from_secs),
    };
    config.validate()?;
    debug!("Loaded configuration: {:?}", config);

    let cancel = CancellationToken::new();
    let watchdog = spawn_watchdog(cancel.clone(), config.timeout);

    let result = handle_command(cli.command, &config, &cancel).await;
    watchdog.abort();

    result
}

/// Cancel `cancel` on Ctrl-C or once `timeout` has elapsed
fn spawn_watchdog(
    cancel: CancellationToken,
    timeout: Option<Duration>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let deadline = async {
            match timeout {
                Some(timeout) => tokio::time::sleep(timeout).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                warn!("Interrupted, cancelling outstanding requests");
            }
            _ = deadline => {
                warn!("Timed out, cancelling outstanding requests");
            }
        }

        cancel.cancel();
    })
}
