//! Metadata repository
//!
//! Read-only lookups of the records that make up a build's lineage:
//! build -> job -> pipeline.

use async_trait::async_trait;
use launcher_client::{ApiClient, Result};
use launcher_core::domain::build::Build;
use launcher_core::domain::job::Job;
use launcher_core::domain::pipeline::Pipeline;

/// Repository trait for metadata lookups
#[async_trait]
pub trait MetadataRepository: Send + Sync {
    /// Fetches a build by ID
    ///
    /// # Arguments
    /// * `build_id` - The opaque build identifier
    async fn build_from_id(&self, build_id: &str) -> Result<Build>;

    /// Fetches a job by ID
    ///
    /// # Arguments
    /// * `job_id` - The job identifier, usually taken from [`Build::job_id`]
    async fn job_from_id(&self, job_id: &str) -> Result<Job>;

    /// Fetches a pipeline by ID
    ///
    /// # Arguments
    /// * `pipeline_id` - The pipeline identifier, usually taken from [`Job::pipeline_id`]
    async fn pipeline_from_id(&self, pipeline_id: &str) -> Result<Pipeline>;
}

/// HTTP implementation of MetadataRepository
pub struct HttpMetadataRepository {
    client: ApiClient,
}

impl HttpMetadataRepository {
    /// Creates a new HTTP metadata repository
    ///
    /// # Arguments
    /// * `client` - A configured API client (base URL and token already set)
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MetadataRepository for HttpMetadataRepository {
    async fn build_from_id(&self, build_id: &str) -> Result<Build> {
        self.client.get_build(build_id).await
    }

    async fn job_from_id(&self, job_id: &str) -> Result<Job> {
        self.client.get_job(job_id).await
    }

    async fn pipeline_from_id(&self, pipeline_id: &str) -> Result<Pipeline> {
        self.client.get_pipeline(pipeline_id).await
    }
}
