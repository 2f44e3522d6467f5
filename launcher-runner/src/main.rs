//! Build Launcher
//!
//! Entry point of a build agent. Given a build ID it walks the build's lineage
//! through the metadata API and prepares a fresh workspace for it.
//!
//! Architecture:
//! - Configuration: Load settings from flags, environment or defaults
//! - Repositories: HTTP lookups against the metadata API (builds, jobs, pipelines)
//! - Services: Business logic (workspace provisioning, launch chain)
//!
//! Running the build's steps happens later and is not part of this binary.

mod config;
mod repository;
mod service;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use colored::*;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, DEFAULT_API_URL, DEFAULT_WORKSPACE_ROOT, read_token_file};
use crate::repository::HttpMetadataRepository;
use crate::service::{Launcher, ScmParsePolicy, WorkspaceProvisioner};
use launcher_client::ApiClient;

/// Log directives used when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str = "launcher=info,launcher_client=info";

#[derive(Parser)]
#[command(name = "launcher", version)]
#[command(about = "Resolve a build and provision its workspace", long_about = None)]
struct Cli {
    /// ID of the build to launch
    build_id: String,

    /// Metadata API URL
    #[arg(long, env = "SD_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Token used to access the metadata API
    #[arg(long, env = "SD_TOKEN", hide_env_values = true, conflicts_with = "token_file")]
    token: Option<String>,

    /// File containing the token used to access the metadata API
    #[arg(long, env = "SD_TOKEN_FILE")]
    token_file: Option<PathBuf>,

    /// Directory under which the workspace is created
    #[arg(long, env = "SD_WORKSPACE_ROOT", default_value = DEFAULT_WORKSPACE_ROOT)]
    workspace_root: PathBuf,

    /// Deadline in seconds for each metadata API call
    #[arg(long, env = "SD_API_TIMEOUT", value_name = "SECONDS")]
    api_timeout: Option<u64>,

    /// Provision a workspace even if the pipeline's SCM URL cannot be parsed
    #[arg(long)]
    allow_invalid_scm_url: bool,
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "Error running launcher:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    info!(
        "Loaded configuration: api_url={}, workspace_root={}",
        config.api_url,
        config.workspace_root.display()
    );

    let mut client = ApiClient::new(config.api_url.clone());
    if let Some(token) = &config.token {
        client = client.with_token(token.clone());
    }

    let launcher = Launcher::new(
        Arc::new(HttpMetadataRepository::new(client)),
        WorkspaceProvisioner::new(config.workspace_root.clone()),
        config.launch_options(),
    );

    let workspace = launcher.launch(&cli.build_id).await.map_err(|e| {
        error!("Launch of build {} failed at stage '{}'", cli.build_id, e.stage());
        e
    })?;

    info!(
        "Workspace ready: src={}, artifacts={}",
        workspace.src.display(),
        workspace.artifacts.display()
    );

    Ok(())
}

/// Builds the configuration from parsed flags and validates it
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::new(cli.api_url.clone());

    if let Some(token) = &cli.token {
        config = config.with_token(token.clone());
    } else if let Some(path) = &cli.token_file {
        config = config.with_token(read_token_file(path)?);
    }

    config.workspace_root = cli.workspace_root.clone();
    config.api_timeout = cli.api_timeout.map(Duration::from_secs);
    if cli.allow_invalid_scm_url {
        config.scm_parse_policy = ScmParsePolicy::Continue;
    }

    config.validate()?;
    Ok(config)
}
