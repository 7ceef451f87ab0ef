//! Clean command handler
//!
//! Removes finished executions so an application's history only shows
//! what is still running.

use anyhow::{Context, Result};
use colored::*;
use tokio_util::sync::CancellationToken;

use super::require;
use crate::service::SpinService;

/// Delete every non-running execution of `app`
pub async fn handle_clean(
    service: &dyn SpinService,
    cancel: &CancellationToken,
    app: &str,
) -> Result<()> {
    require(app, "--app")?;

    let deleted = service
        .remove_non_running_executions(cancel, app)
        .await
        .with_context(|| format!("Failed to clean executions of {}", app))?;

    if deleted == 0 {
        println!("{}", format!("No executions to delete in {}.", app).yellow());
    } else {
        println!(
            "{}",
            format!("✓ Deleted {} execution(s) from {}", deleted, app)
                .green()
                .bold()
        );
    }

    Ok(())
}
