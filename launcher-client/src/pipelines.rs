//! Pipeline-related API endpoints

use crate::{ApiClient, Resource};
use crate::error::Result;
use launcher_core::domain::pipeline::Pipeline;

impl ApiClient {
    /// Get a pipeline by ID
    ///
    /// # Arguments
    /// * `pipeline_id` - The pipeline identifier
    ///
    /// # Returns
    /// The pipeline details, including its SCM locator
    pub async fn get_pipeline(&self, pipeline_id: &str) -> Result<Pipeline> {
        self.fetch(Resource::Pipeline, pipeline_id).await
    }
}
