//! Launch service
//!
//! Resolves a build's lineage and prepares its workspace:
//! 1. Fetch the build
//! 2. Fetch the job the build belongs to
//! 3. Fetch the pipeline the job belongs to
//! 4. Parse the pipeline's SCM locator
//! 5. Provision the workspace for the repository
//!
//! Each step runs only after the previous one succeeded. The first failure is
//! returned, tagged with the stage it happened in. Nothing is retried.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use launcher_client::ClientError;
use launcher_core::scm::{ScmCoordinates, ScmParseError, parse_scm_url};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::repository::MetadataRepository;
use crate::service::workspace::{ProvisionError, Workspace, WorkspaceProvisioner};

/// Step of the launch chain, used to tag errors with their origin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    FetchBuild,
    FetchJob,
    FetchPipeline,
    ParseScm,
    Provision,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::FetchBuild => "fetch build",
            Stage::FetchJob => "fetch job",
            Stage::FetchPipeline => "fetch pipeline",
            Stage::ParseScm => "parse SCM URL",
            Stage::Provision => "provision workspace",
        };
        f.write_str(name)
    }
}

/// What to do when the pipeline's SCM locator cannot be parsed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScmParsePolicy {
    /// Stop the launch with [`LaunchError::ParseScm`]
    #[default]
    Abort,
    /// Log a warning and provision with empty coordinates, which yields a
    /// workspace whose source path is `<root>/src`
    Continue,
}

/// Tunables for a launch
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    /// Deadline applied to each metadata lookup; `None` waits forever
    pub call_timeout: Option<Duration>,
    pub scm_parse_policy: ScmParsePolicy,
}

/// A failed launch, one variant per stage
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("fetching build ID {build_id:?}")]
    FetchBuild {
        build_id: String,
        source: ClientError,
    },

    #[error("fetching job ID {job_id:?}")]
    FetchJob { job_id: String, source: ClientError },

    #[error("fetching pipeline ID {pipeline_id:?}")]
    FetchPipeline {
        pipeline_id: String,
        source: ClientError,
    },

    #[error("parsing SCM URL of pipeline {pipeline_id:?}")]
    ParseScm {
        pipeline_id: String,
        source: ScmParseError,
    },

    #[error("provisioning workspace for build {build_id:?}")]
    Provision {
        build_id: String,
        source: ProvisionError,
    },
}

impl LaunchError {
    /// The stage the launch failed in
    pub fn stage(&self) -> Stage {
        match self {
            LaunchError::FetchBuild { .. } => Stage::FetchBuild,
            LaunchError::FetchJob { .. } => Stage::FetchJob,
            LaunchError::FetchPipeline { .. } => Stage::FetchPipeline,
            LaunchError::ParseScm { .. } => Stage::ParseScm,
            LaunchError::Provision { .. } => Stage::Provision,
        }
    }
}

/// Drives the lookup chain for a build and provisions its workspace
pub struct Launcher {
    repository: Arc<dyn MetadataRepository>,
    provisioner: WorkspaceProvisioner,
    options: LaunchOptions,
}

impl Launcher {
    /// Creates a new launcher
    ///
    /// # Arguments
    /// * `repository` - Source of build, job and pipeline records
    /// * `provisioner` - Creates the workspace directories
    /// * `options` - Per-call deadline and parse-failure policy
    pub fn new(
        repository: Arc<dyn MetadataRepository>,
        provisioner: WorkspaceProvisioner,
        options: LaunchOptions,
    ) -> Self {
        Self {
            repository,
            provisioner,
            options,
        }
    }

    /// Launches a build
    ///
    /// # Arguments
    /// * `build_id` - The opaque build identifier
    ///
    /// # Returns
    /// The freshly created workspace
    pub async fn launch(&self, build_id: &str) -> Result<Workspace, LaunchError> {
        info!("Launching build {}", build_id);

        let build = self
            .with_deadline(self.repository.build_from_id(build_id))
            .await
            .map_err(|source| LaunchError::FetchBuild {
                build_id: build_id.to_string(),
                source,
            })?;
        debug!("Build {} belongs to job {}", build.id, build.job_id);

        let job = self
            .with_deadline(self.repository.job_from_id(&build.job_id))
            .await
            .map_err(|source| LaunchError::FetchJob {
                job_id: build.job_id.clone(),
                source,
            })?;
        debug!("Job {} belongs to pipeline {}", job.id, job.pipeline_id);

        let pipeline = self
            .with_deadline(self.repository.pipeline_from_id(&job.pipeline_id))
            .await
            .map_err(|source| LaunchError::FetchPipeline {
                pipeline_id: job.pipeline_id.clone(),
                source,
            })?;

        let scm = match parse_scm_url(&pipeline.scm_url) {
            Ok(scm) => scm,
            Err(source) => match self.options.scm_parse_policy {
                ScmParsePolicy::Abort => {
                    return Err(LaunchError::ParseScm {
                        pipeline_id: pipeline.id,
                        source,
                    });
                }
                ScmParsePolicy::Continue => {
                    warn!("{}; continuing with empty SCM coordinates", source);
                    ScmCoordinates::default()
                }
            },
        };
        info!("Pipeline {} checks out {}", pipeline.id, scm);

        let workspace = self
            .provisioner
            .create(&[scm.org.as_str(), scm.repo.as_str()])
            .map_err(|source| LaunchError::Provision {
                build_id: build_id.to_string(),
                source,
            })?;

        info!("Build {} is ready to run", build_id);
        Ok(workspace)
    }

    /// Applies the configured deadline to a single metadata lookup
    async fn with_deadline<T>(
        &self,
        call: impl Future<Output = launcher_client::Result<T>>,
    ) -> launcher_client::Result<T> {
        match self.options.call_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| ClientError::Timeout(limit))?,
            None => call.await,
        }
    }
}
