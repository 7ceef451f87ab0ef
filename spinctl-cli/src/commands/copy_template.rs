//! Copy-template command handler

use anyhow::{Context, Result};
use colored::*;
use tokio_util::sync::CancellationToken;

use super::require;
use crate::service::SpinService;

/// Copy templated pipeline `pipeline` from application `from` to `to`
pub async fn handle_copy_template(
    service: &dyn SpinService,
    cancel: &CancellationToken,
    pipeline: &str,
    from: &str,
    to: &str,
) -> Result<()> {
    require(from, "--from")?;
    require(to, "--to")?;
    require(pipeline, "--pipeline")?;

    let created = service
        .copy_templated_pipeline(cancel, pipeline, from, to)
        .await
        .with_context(|| format!("Failed to copy pipeline {} from {} to {}", pipeline, from, to))?;

    println!("{}", "✓ Pipeline copied successfully!".green().bold());
    if let Some(id) = &created.id {
        println!("  ID:          {}", id.cyan());
    }
    println!("  Name:        {}", created.name.bold());
    println!("  Application: {}", created.application);
    if let Some(template) = &created.template {
        println!("  Template:    {}", template.reference.dimmed());
    }
    println!(
        "  Variables:   {}",
        created.variables.len().to_string().dimmed()
    );

    Ok(())
}
