//! Job-related API endpoints

use crate::{ApiClient, Resource};
use crate::error::Result;
use launcher_core::domain::job::Job;

impl ApiClient {
    /// Get a job by ID
    ///
    /// # Arguments
    /// * `job_id` - The job identifier
    ///
    /// # Returns
    /// The job details, including the ID of its pipeline
    pub async fn get_job(&self, job_id: &str) -> Result<Job> {
        self.fetch(Resource::Job, job_id).await
    }
}
