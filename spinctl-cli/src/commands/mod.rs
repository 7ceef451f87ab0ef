//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod clean;
mod copy_template;

use anyhow::{Context, Result};
use clap::Subcommand;
use spinctl_client::GateClient;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::repository::HttpSpinRepository;
use crate::service::StandardSpinService;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Delete every execution of an application that is not running
    Clean {
        /// Application to clean
        #[arg(short, long)]
        app: String,
    },
    /// Copy a templated pipeline from one application to another
    CopyTemplate {
        /// Application to copy the pipeline from
        #[arg(long)]
        from: String,

        /// Application to copy the pipeline to
        #[arg(long)]
        to: String,

        /// Name of the pipeline to copy
        #[arg(short, long)]
        pipeline: String,
    },
}

/// Handle a CLI command
///
/// Builds the service stack from `config` and routes the command to its
/// handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
/// * `cancel` - Fires when the command should stop (timeout or Ctrl-C)
pub async fn handle_command(
    command: Commands,
    config: &Config,
    cancel: &CancellationToken,
) -> Result<()> {
    let service = build_service(config)?;

    match command {
        Commands::Clean { app } => clean::handle_clean(&service, cancel, &app).await,
        Commands::CopyTemplate { from, to, pipeline } => {
            copy_template::handle_copy_template(&service, cancel, &pipeline, &from, &to).await
        }
    }
}

fn build_service(config: &Config) -> Result<StandardSpinService> {
    let client = GateClient::new(&config.gate_url).context("Failed to create Gate client")?;
    let repository = HttpSpinRepository::new(client, &config.token)
        .context("Failed to create Spinnaker repository")?;

    Ok(StandardSpinService::new(Arc::new(repository)))
}

/// Fail with `<flag> is required` when a flag was given an empty value
fn require(value: &str, flag: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{} is required", flag);
    }
    Ok(())
}
