//! Spinnaker service
//!
//! Bulk cleanup of finished executions and copying of templated pipelines
//! between applications.

use async_trait::async_trait;
use spinctl_client::ClientError;
use spinctl_core::domain::pipeline::PipelineConfig;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::repository::{EXECUTION_PAGE_SIZE, SpinRepository};

/// Service error type
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A pipeline name exists in both the source and destination application
    #[error("application {application} already contains a pipeline named {name}")]
    DestinationNameConflict { application: String, name: String },

    /// The pipeline to copy does not exist in the source application
    #[error("pipeline {name} not found in application {application}")]
    PipelineNotFound { application: String, name: String },

    #[error(transparent)]
    Client(#[from] ClientError),

    /// A delete task panicked or was aborted
    #[error("delete task failed: {0}")]
    Task(#[from] JoinError),
}

pub type Result<T> = std::result::Result<T, ServiceError>;

/// Service trait for pipeline maintenance operations
#[async_trait]
pub trait SpinService: Send + Sync {
    /// Deletes every execution of `application` that is not running
    ///
    /// Deletions run concurrently. The first failure cancels the remaining
    /// deletions and is returned; deletions that already went through are
    /// not undone.
    ///
    /// # Returns
    /// The number of executions deleted
    async fn remove_non_running_executions(
        &self,
        cancel: &CancellationToken,
        application: &str,
    ) -> Result<usize>;

    /// Copies the templated pipeline `pipeline` from application `from` to `to`
    ///
    /// # Returns
    /// The pipeline config created in `to`
    async fn copy_templated_pipeline(
        &self,
        cancel: &CancellationToken,
        pipeline: &str,
        from: &str,
        to: &str,
    ) -> Result<PipelineConfig>;
}

/// Standard implementation of SpinService
pub struct StandardSpinService {
    repository: Arc<dyn SpinRepository>,
}

impl StandardSpinService {
    /// Creates a new service backed by `repository`
    pub fn new(repository: Arc<dyn SpinRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl SpinService for StandardSpinService {
    async fn remove_non_running_executions(
        &self,
        cancel: &CancellationToken,
        application: &str,
    ) -> Result<usize> {
        let executions = self
            .repository
            .get_application_pipeline_executions(cancel, application)
            .await?;

        if executions.len() >= EXECUTION_PAGE_SIZE {
            warn!(
                "Application {} returned a full page of {} executions, older ones are not examined",
                application, EXECUTION_PAGE_SIZE
            );
        }

        let candidates: Vec<String> = executions
            .into_iter()
            .filter(|execution| execution.is_removable())
            .map(|execution| {
                debug!(
                    "Queueing {} ({}) of pipeline {}",
                    execution.id,
                    execution.status,
                    execution.name.as_deref().unwrap_or("<unnamed>")
                );
                execution.id
            })
            .collect();

        info!(
            "Deleting {} non-running execution(s) of {}",
            candidates.len(),
            application
        );

        // Siblings share one scope so the first failure stops the rest
        let scope = cancel.child_token();
        let mut tasks = JoinSet::new();

        for id in candidates {
            let repository = Arc::clone(&self.repository);
            let scope = scope.clone();
            tasks.spawn(async move { repository.delete_pipeline_execution(&scope, &id).await });
        }

        let mut deleted = 0;
        let mut first_error: Option<ServiceError> = None;

        while let Some(joined) = tasks.join_next().await {
            let error = match joined {
                Ok(Ok(())) => {
                    deleted += 1;
                    continue;
                }
                Ok(Err(e)) => ServiceError::from(e),
                Err(e) => ServiceError::from(e),
            };

            if first_error.is_none() {
                scope.cancel();
                first_error = Some(error);
            } else {
                debug!("Discarding subsequent delete failure: {}", error);
            }
        }

        match first_error {
            Some(error) => Err(error),
            None => {
                info!("Deleted {} execution(s) of {}", deleted, application);
                Ok(deleted)
            }
        }
    }

    async fn copy_templated_pipeline(
        &self,
        cancel: &CancellationToken,
        pipeline: &str,
        from: &str,
        to: &str,
    ) -> Result<PipelineConfig> {
        let from_configs = self
            .repository
            .get_application_pipeline_configs(cancel, from)
            .await?;
        let to_configs = self
            .repository
            .get_application_pipeline_configs(cancel, to)
            .await?;

        // Any shared name blocks the copy, not only `pipeline`
        if let Some(conflict) = from_configs
            .iter()
            .find(|source| to_configs.iter().any(|dest| dest.name == source.name))
        {
            return Err(ServiceError::DestinationNameConflict {
                application: to.to_string(),
                name: conflict.name.clone(),
            });
        }

        let original = from_configs
            .into_iter()
            .find(|config| config.name == pipeline)
            .ok_or_else(|| ServiceError::PipelineNotFound {
                application: from.to_string(),
                name: pipeline.to_string(),
            })?;

        let config =
            PipelineConfig::templated(to, pipeline, original.template, original.variables);

        let created = self
            .repository
            .create_pipeline_config(cancel, &config)
            .await?;

        info!("Copied pipeline {} from {} to {}", pipeline, from, to);

        Ok(created)
    }
}
