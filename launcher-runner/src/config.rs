//! Launcher configuration
//!
//! Defines all configurable parameters for the launcher: where the metadata
//! API lives, how to authenticate against it, and where workspaces are created.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;

use crate::service::{LaunchOptions, ScmParsePolicy};

/// Metadata API used when none is configured
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Directory under which every build workspace is created
pub const DEFAULT_WORKSPACE_ROOT: &str = "/sd/workspace";

/// Launcher configuration
#[derive(Clone)]
pub struct Config {
    /// Metadata API base URL (e.g., "http://localhost:8080")
    pub api_url: String,

    /// Bearer token for the metadata API
    pub token: Option<String>,

    /// Base directory of the build workspace
    pub workspace_root: PathBuf,

    /// Deadline for each metadata lookup; `None` waits indefinitely
    pub api_timeout: Option<Duration>,

    /// Behavior when the pipeline's SCM locator is malformed
    pub scm_parse_policy: ScmParsePolicy,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(api_url: String) -> Self {
        Self {
            api_url,
            token: None,
            workspace_root: PathBuf::from(DEFAULT_WORKSPACE_ROOT),
            api_timeout: None,
            scm_parse_policy: ScmParsePolicy::Abort,
        }
    }

    /// Sets the API token
    pub fn with_token(mut self, token: String) -> Self {
        self.token = Some(token);
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_url.is_empty() {
            anyhow::bail!("api_url cannot be empty");
        }

        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            anyhow::bail!("api_url must start with http:// or https://");
        }

        if matches!(&self.token, Some(token) if token.trim().is_empty()) {
            anyhow::bail!("token cannot be empty");
        }

        if !self.workspace_root.is_absolute() {
            anyhow::bail!(
                "workspace_root must be an absolute path, got {}",
                self.workspace_root.display()
            );
        }

        if self.api_timeout.is_some_and(|timeout| timeout.is_zero()) {
            anyhow::bail!("api_timeout must be greater than 0");
        }

        Ok(())
    }

    /// Options handed to the launch service
    pub fn launch_options(&self) -> LaunchOptions {
        LaunchOptions {
            call_timeout: self.api_timeout,
            scm_parse_policy: self.scm_parse_policy,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL.to_string())
    }
}

// Keeps the token out of logs
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_url", &self.api_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("workspace_root", &self.workspace_root)
            .field("api_timeout", &self.api_timeout)
            .field("scm_parse_policy", &self.scm_parse_policy)
            .finish()
    }
}

/// Reads an API token from a file, trimming surrounding whitespace
pub fn read_token_file(path: &Path) -> anyhow::Result<String> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read token file {}", path.display()))?;

    let token = contents.trim();
    if token.is_empty() {
        anyhow::bail!("Token file {} is empty", path.display());
    }

    Ok(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.workspace_root, PathBuf::from("/sd/workspace"));
        assert_eq!(config.scm_parse_policy, ScmParsePolicy::Abort);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        // Valid config should pass
        assert!(config.validate().is_ok());

        // Invalid URL should fail
        config.api_url = "not-a-url".to_string();
        assert!(config.validate().is_err());

        config.api_url = String::new();
        assert!(config.validate().is_err());

        config.api_url = "https://api.example.com".to_string();
        assert!(config.validate().is_ok());

        // Relative root should fail
        config.workspace_root = PathBuf::from("sd/workspace");
        assert!(config.validate().is_err());

        config.workspace_root = PathBuf::from("/tmp/ws");
        config.api_timeout = Some(Duration::ZERO);
        assert!(config.validate().is_err());

        config.api_timeout = Some(Duration::from_secs(10));
        assert!(config.validate().is_ok());

        config.token = Some("  ".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_launch_options() {
        let config = Config {
            api_timeout: Some(Duration::from_secs(3)),
            scm_parse_policy: ScmParsePolicy::Continue,
            ..Config::default()
        };

        let options = config.launch_options();
        assert_eq!(options.call_timeout, Some(Duration::from_secs(3)));
        assert_eq!(options.scm_parse_policy, ScmParsePolicy::Continue);
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = Config::default().with_token("super-secret".to_string());
        let rendered = format!("{:?}", config);

        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_read_token_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("token");
        std::fs::write(&path, "jwt-token\n").unwrap();

        assert_eq!(read_token_file(&path).unwrap(), "jwt-token");
    }

    #[test]
    fn test_read_token_file_errors() {
        let dir = TempDir::new().unwrap();
        assert!(read_token_file(&dir.path().join("missing")).is_err());

        let path = dir.path().join("empty");
        std::fs::write(&path, "\n").unwrap();
        assert!(read_token_file(&path).is_err());
    }
}
