//! SCM locator parsing
//!
//! A pipeline names its repository with a compact locator of the form
//! `host:org/repo#branch`, e.g. `git@github.com:screwdriver-cd/launcher.git#master`.
//!
//! Fields are split with an anchored scan rather than a pattern match:
//! - the branch is everything after the first `#`
//! - the repository is everything after the last `/` before that
//! - the organization is everything after the last `:` before that
//!
//! Hosts may therefore contain `:`, organizations may contain `/` (nested
//! groups) and branches may contain both `/` and `#`.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Structured coordinates of a source-control repository
///
/// Every field is non-empty when produced by [`parse_scm_url`]. The
/// `Default` value (all fields empty) only exists for callers that choose to
/// carry on after a parse failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScmCoordinates {
    pub host: String,
    pub org: String,
    pub repo: String,
    pub branch: String,
}

impl fmt::Display for ScmCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}/{}#{}", self.host, self.org, self.repo, self.branch)
    }
}

impl FromStr for ScmCoordinates {
    type Err = ScmParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_scm_url(s)
    }
}

/// Error returned when a locator does not have the `host:org/repo#branch` shape
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unable to parse SCM URL {input:?}: {reason}")]
pub struct ScmParseError {
    /// The locator exactly as received
    pub input: String,
    /// What was wrong with it
    pub reason: &'static str,
}

impl ScmParseError {
    fn new(input: &str, reason: &'static str) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }
}

/// Parses an SCM locator into its four coordinates
///
/// Parsing is all-or-nothing: either every field is present and non-empty, or
/// an error is returned.
///
/// # Example
/// ```
/// use launcher_core::scm::parse_scm_url;
///
/// let scm = parse_scm_url("git@github.com:screwdriver-cd/launcher.git#master").unwrap();
/// assert_eq!(scm.org, "screwdriver-cd");
/// assert_eq!(scm.repo, "launcher.git");
/// ```
pub fn parse_scm_url(url: &str) -> Result<ScmCoordinates, ScmParseError> {
    if url.contains(['\n', '\r']) {
        return Err(ScmParseError::new(url, "contains a line break"));
    }

    let (head, branch) = url
        .split_once('#')
        .ok_or_else(|| ScmParseError::new(url, "missing '#' before the branch"))?;

    let (rest, repo) = head.rsplit_once('/').ok_or_else(|| {
        ScmParseError::new(url, "missing '/' between organization and repository")
    })?;

    let (host, org) = rest
        .rsplit_once(':')
        .ok_or_else(|| ScmParseError::new(url, "missing ':' after the host"))?;

    let fields = [
        (host, "host is empty"),
        (org, "organization is empty"),
        (repo, "repository is empty"),
        (branch, "branch is empty"),
    ];
    if let Some((_, reason)) = fields.iter().find(|(value, _)| value.is_empty()) {
        return Err(ScmParseError::new(url, *reason));
    }

    Ok(ScmCoordinates {
        host: host.to_string(),
        org: org.to_string(),
        repo: repo.to_string(),
        branch: branch.to_string(),
    })
}
