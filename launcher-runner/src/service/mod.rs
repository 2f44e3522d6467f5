//! Service layer
//!
//! Services contain the business logic of the launcher: provisioning the
//! on-disk workspace and driving the lookup chain that leads to it.

mod launch;
mod workspace;

pub use launch::{LaunchOptions, Launcher, ScmParsePolicy};
pub use workspace::WorkspaceProvisioner;
