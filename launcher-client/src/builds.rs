//! Build-related API endpoints

use crate::{ApiClient, Resource};
use crate::error::Result;
use launcher_core::domain::build::Build;

impl ApiClient {
    /// Get a build by ID
    ///
    /// # Arguments
    /// * `build_id` - The build identifier
    ///
    /// # Returns
    /// The build details, including the ID of the job it belongs to
    ///
    /// # Example
    /// ```no_run
    /// # use launcher_client::ApiClient;
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = ApiClient::new("http://localhost:8080");
    /// let build = client.get_build("1234").await?;
    /// println!("Build {} belongs to job {}", build.id, build.job_id);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_build(&self, build_id: &str) -> Result<Build> {
        self.fetch(Resource::Build, build_id).await
    }
}
