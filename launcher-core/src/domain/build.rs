//! Build domain types

use serde::{Deserialize, Serialize};

/// A single build as recorded by the metadata API
///
/// Only `job_id` is needed to walk the lineage; the remaining fields are
/// informational and may be absent depending on the API version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Build {
    pub id: String,
    pub job_id: String,
    #[serde(default)]
    pub number: Option<u64>,
    #[serde(default)]
    pub status: Option<BuildStatus>,
    #[serde(default)]
    pub cause: Option<String>,
    #[serde(default)]
    pub sha: Option<String>,
    #[serde(default)]
    pub create_time: Option<chrono::DateTime<chrono::Utc>>,
}

/// Build status as reported by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildStatus {
    Queued,
    Running,
    Success,
    Failure,
    Aborted,
}
