//! Workspace provisioning
//!
//! Every build gets a fresh directory pair under the workspace root:
//! - `<root>/src/<org>/<repo>`: where the repository is checked out
//! - `<root>/artifacts`: where the build writes its outputs
//!
//! Both directories must be absent beforehand. Provisioning is all-or-nothing:
//! if the second directory cannot be created, the directories created for the
//! first one are removed again.

use std::cmp::Reverse;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

const SRC_DIR: &str = "src";
const ARTIFACTS_DIR: &str = "artifacts";

/// Paths available to a build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    pub root: PathBuf,
    pub src: PathBuf,
    pub artifacts: PathBuf,
}

/// Errors raised while provisioning a workspace
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("cannot create workspace path {path:?}, path already exists")]
    AlreadyExists { path: PathBuf },

    #[error("cannot create workspace path {path:?}")]
    CreateFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid workspace path segment {segment:?}")]
    InvalidSegment { segment: String },
}

/// Creates build workspaces under a fixed root directory
#[derive(Debug, Clone)]
pub struct WorkspaceProvisioner {
    root: PathBuf,
}

impl WorkspaceProvisioner {
    /// Creates a provisioner rooted at `root` (e.g. `/sd/workspace`)
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Derives the workspace paths for the given source segments without
    /// touching the filesystem
    ///
    /// Segments are joined like path components: a segment may contain `/`,
    /// empty components are skipped, and `.` or `..` are rejected so that the
    /// source path always stays below the root.
    pub fn layout(&self, segments: &[&str]) -> Result<Workspace, ProvisionError> {
        let mut src = self.root.join(SRC_DIR);

        for segment in segments {
            for component in segment.split('/') {
                match component {
                    "" => continue,
                    "." | ".." => {
                        return Err(ProvisionError::InvalidSegment {
                            segment: segment.to_string(),
                        });
                    }
                    component => src.push(component),
                }
            }
        }

        Ok(Workspace {
            root: self.root.clone(),
            src,
            artifacts: self.root.join(ARTIFACTS_DIR),
        })
    }

    /// Creates the workspace directories for the given source segments
    ///
    /// The source path is handled first, then the artifacts path. The first
    /// failure aborts provisioning and rolls back whatever was created.
    ///
    /// # Example
    /// `["screwdriver-cd", "launcher"]` creates
    /// `<root>/src/screwdriver-cd/launcher` and `<root>/artifacts`.
    pub fn create(&self, segments: &[&str]) -> Result<Workspace, ProvisionError> {
        let workspace = self.layout(segments)?;
        let mut created = Vec::new();

        for path in [&workspace.src, &workspace.artifacts] {
            if let Err(e) = create_fresh_dir(path, &mut created) {
                rollback(&mut created);
                return Err(e);
            }
        }

        info!(
            "Created workspace: src={}, artifacts={}",
            workspace.src.display(),
            workspace.artifacts.display()
        );

        Ok(workspace)
    }
}

/// Creates `path` and any missing parents, refusing if `path` already exists
///
/// Directories that did not exist beforehand are appended to `created`, even
/// when creation fails halfway through the chain.
fn create_fresh_dir(path: &Path, created: &mut Vec<PathBuf>) -> Result<(), ProvisionError> {
    if path.exists() {
        return Err(ProvisionError::AlreadyExists {
            path: path.to_path_buf(),
        });
    }

    created.extend(
        path.ancestors()
            .take_while(|dir| !dir.exists())
            .map(Path::to_path_buf),
    );

    dir_builder()
        .create(path)
        .map_err(|source| ProvisionError::CreateFailed {
            path: path.to_path_buf(),
            source,
        })?;

    debug!("Created {}", path.display());
    Ok(())
}

fn dir_builder() -> fs::DirBuilder {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        // Subject to the process umask
        builder.mode(0o777);
    }

    builder
}

/// Best-effort removal of directories created by a failed provisioning run
fn rollback(created: &mut [PathBuf]) {
    // Children before parents
    created.sort_by_key(|dir| Reverse(dir.components().count()));

    for dir in created.iter() {
        match fs::remove_dir(dir) {
            Ok(()) => debug!("Rolled back {}", dir.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove {} during rollback: {}", dir.display(), e),
        }
    }
}
