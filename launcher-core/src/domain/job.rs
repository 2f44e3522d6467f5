//! Job domain types

use serde::{Deserialize, Serialize};

/// Job record
///
/// A job belongs to exactly one pipeline and owns many builds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub pipeline_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub state: Option<JobState>,
}

/// Whether the job accepts new builds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobState {
    Enabled,
    Disabled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_deserializes() {
        let job: Job = serde_json::from_str(
            r#"{"id": "j1", "pipelineId": "p1", "name": "main", "state": "ENABLED"}"#,
        )
        .unwrap();

        assert_eq!(job.pipeline_id, "p1");
        assert_eq!(job.name.as_deref(), Some("main"));
        assert_eq!(job.state, Some(JobState::Enabled));
    }
}
