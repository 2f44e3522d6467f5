//! Pipeline domain types

use serde::{Deserialize, Serialize};

/// Pipeline record
///
/// `scm_url` is the compact SCM locator (`host:org/repo#branch`) that the
/// launcher turns into a workspace layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pipeline {
    pub id: String,
    pub scm_url: String,
    #[serde(default)]
    pub config_url: Option<String>,
    #[serde(default)]
    pub create_time: Option<chrono::DateTime<chrono::Utc>>,
}
