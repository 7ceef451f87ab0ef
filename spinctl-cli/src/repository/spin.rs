//! Spinnaker repository
//!
//! Handles communication with Gate for pipeline operations:
//! - Listing an application's pipeline configs
//! - Listing an application's recent executions
//! - Deleting executions
//! - Saving new pipeline configs

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Method, Request};
use spinctl_client::{ClientError, GateClient, Result};
use spinctl_core::domain::execution::PipelineExecution;
use spinctl_core::domain::pipeline::PipelineConfig;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Number of executions requested from Gate in one listing
///
/// Only the first page is ever fetched.
pub const EXECUTION_PAGE_SIZE: usize = 50;

const PIPELINES_PATH: &str = "/pipelines";

/// Repository trait for pipeline operations against Gate
#[async_trait]
pub trait SpinRepository: Send + Sync {
    /// Lists the pipeline configs of an application
    async fn get_application_pipeline_configs(
        &self,
        cancel: &CancellationToken,
        application: &str,
    ) -> Result<Vec<PipelineConfig>>;

    /// Lists the most recent executions of an application
    ///
    /// Returns at most [`EXECUTION_PAGE_SIZE`] executions.
    async fn get_application_pipeline_executions(
        &self,
        cancel: &CancellationToken,
        application: &str,
    ) -> Result<Vec<PipelineExecution>>;

    /// Deletes an execution by id
    async fn delete_pipeline_execution(&self, cancel: &CancellationToken, id: &str) -> Result<()>;

    /// Saves a new pipeline config
    ///
    /// # Returns
    /// The config as stored by Gate
    async fn create_pipeline_config(
        &self,
        cancel: &CancellationToken,
        config: &PipelineConfig,
    ) -> Result<PipelineConfig>;
}

/// HTTP implementation of SpinRepository
pub struct HttpSpinRepository {
    client: GateClient,
    token: HeaderValue,
}

impl HttpSpinRepository {
    /// Creates a new HTTP repository
    ///
    /// # Arguments
    /// * `client` - Gate client bound to the Gate base URL
    /// * `token` - Bearer token, sent verbatim in the `authorization` header
    ///
    /// # Errors
    /// Fails with [`ClientError::MissingCredential`] when `token` is empty.
    pub fn new(client: GateClient, token: &str) -> Result<Self> {
        if token.is_empty() {
            return Err(ClientError::MissingCredential);
        }

        let mut token = HeaderValue::from_str(token).map_err(|_| ClientError::InvalidCredential)?;
        token.set_sensitive(true);

        Ok(Self { client, token })
    }

    fn authorize(&self, mut request: Request) -> Request {
        request
            .headers_mut()
            .insert(AUTHORIZATION, self.token.clone());
        request
    }
}

#[async_trait]
impl SpinRepository for HttpSpinRepository {
    async fn get_application_pipeline_configs(
        &self,
        cancel: &CancellationToken,
        application: &str,
    ) -> Result<Vec<PipelineConfig>> {
        let path = format!("/applications/{}/pipelineConfigs", application);
        let request = self.client.new_request(Method::GET, &path, &[])?;

        let configs: Option<Vec<PipelineConfig>> = self
            .client
            .execute(cancel, self.authorize(request))
            .await?;

        Ok(configs.unwrap_or_default())
    }

    async fn get_application_pipeline_executions(
        &self,
        cancel: &CancellationToken,
        application: &str,
    ) -> Result<Vec<PipelineExecution>> {
        let path = format!("/applications/{}/pipelines", application);
        let limit = EXECUTION_PAGE_SIZE.to_string();
        let request = self.client.new_request(
            Method::GET,
            &path,
            &[("expanded", "true"), ("limit", limit.as_str())],
        )?;

        let executions: Option<Vec<PipelineExecution>> = self
            .client
            .execute(cancel, self.authorize(request))
            .await?;

        Ok(executions.unwrap_or_default())
    }

    async fn delete_pipeline_execution(&self, cancel: &CancellationToken, id: &str) -> Result<()> {
        let path = format!("{}/{}", PIPELINES_PATH, id);
        let request = self.client.new_request(Method::DELETE, &path, &[])?;

        self.client.send(cancel, self.authorize(request)).await?;
        debug!("Deleted execution {}", id);

        Ok(())
    }

    async fn create_pipeline_config(
        &self,
        cancel: &CancellationToken,
        config: &PipelineConfig,
    ) -> Result<PipelineConfig> {
        let request = self
            .client
            .new_json_request(Method::POST, PIPELINES_PATH, &[], config)?;

        let created: Option<PipelineConfig> = self
            .client
            .execute(cancel, self.authorize(request))
            .await?;

        // Gate answers some saves with an empty body
        Ok(created.unwrap_or_else(|| config.clone()))
    }
}
