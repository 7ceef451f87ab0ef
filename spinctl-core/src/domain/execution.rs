//! Pipeline execution domain types

use serde::{Deserialize, Serialize};
use std::fmt;

use super::null_as_default;

/// One run of a pipeline, as returned by `GET /applications/{app}/pipelines`
///
/// Gate returns far more than this; only the fields spinctl acts on are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineExecution {
    /// Execution id. Empty when Gate returned a record without one.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default)]
    pub status: ExecutionStatus,
    /// Name of the pipeline this execution belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl PipelineExecution {
    /// Whether this execution may be deleted by a cleanup
    ///
    /// Records without an id can't be addressed, and running executions
    /// are left alone. Every other status qualifies, including ones spinctl
    /// doesn't recognize.
    pub fn is_removable(&self) -> bool {
        !self.id.is_empty() && !self.status.is_running()
    }
}

/// Execution lifecycle status
///
/// Orca has many more statuses than the three spinctl cares about; any other
/// value is carried verbatim in [`ExecutionStatus::Other`] and written back
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum ExecutionStatus {
    Running,
    Succeeded,
    Failed,
    Other(String),
}

impl ExecutionStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, ExecutionStatus::Running)
    }

    /// The wire representation of this status
    pub fn as_str(&self) -> &str {
        match self {
            ExecutionStatus::Running => "RUNNING",
            ExecutionStatus::Succeeded => "SUCCEEDED",
            ExecutionStatus::Failed => "FAILED",
            ExecutionStatus::Other(status) => status,
        }
    }
}

/// A missing or null status is treated as an unrecognized empty one.
impl Default for ExecutionStatus {
    fn default() -> Self {
        ExecutionStatus::Other(String::new())
    }
}

impl From<String> for ExecutionStatus {
    fn from(status: String) -> Self {
        match status.as_str() {
            "RUNNING" => ExecutionStatus::Running,
            "SUCCEEDED" => ExecutionStatus::Succeeded,
            "FAILED" => ExecutionStatus::Failed,
            _ => ExecutionStatus::Other(status),
        }
    }
}

impl From<Option<String>> for ExecutionStatus {
    fn from(status: Option<String>) -> Self {
        status.map(ExecutionStatus::from).unwrap_or_default()
    }
}

impl From<&str> for ExecutionStatus {
    fn from(status: &str) -> Self {
        ExecutionStatus::from(status.to_string())
    }
}

impl From<ExecutionStatus> for String {
    fn from(status: ExecutionStatus) -> Self {
        match status {
            ExecutionStatus::Other(status) => status,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_known_statuses() {
        let executions: Vec<PipelineExecution> = serde_json::from_value(json!([
            {"id": "e1", "status": "RUNNING"},
            {"id": "e2", "status": "SUCCEEDED"},
            {"id": "e3", "status": "FAILED"},
        ]))
        .unwrap();

        assert_eq!(executions[0].status, ExecutionStatus::Running);
        assert_eq!(executions[1].status, ExecutionStatus::Succeeded);
        assert_eq!(executions[2].status, ExecutionStatus::Failed);
    }

    #[test]
    fn test_unknown_status_passes_through() {
        let execution: PipelineExecution =
            serde_json::from_value(json!({"id": "e1", "status": "TERMINAL"})).unwrap();

        assert_eq!(
            execution.status,
            ExecutionStatus::Other("TERMINAL".to_string())
        );
        assert_eq!(
            serde_json::to_value(&execution).unwrap()["status"],
            json!("TERMINAL")
        );
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let execution: PipelineExecution =
            serde_json::from_value(json!({"buildTime": 1700000000000u64})).unwrap();

        assert_eq!(execution.id, "");
        assert_eq!(execution.status, ExecutionStatus::Other(String::new()));
        assert!(!execution.is_removable());
    }

    #[test]
    fn test_null_fields_default_to_empty() {
        let executions: Vec<PipelineExecution> = serde_json::from_value(json!([
            {"id": "e1", "status": null, "name": null},
            {"id": null, "status": "FAILED"},
            {"id": "e3", "status": "SUCCEEDED"},
        ]))
        .unwrap();

        assert_eq!(executions[0].status, ExecutionStatus::Other(String::new()));
        assert_eq!(executions[0].name, None);
        assert!(executions[0].is_removable());
        assert_eq!(executions[1].id, "");
        assert!(!executions[1].is_removable());
        assert_eq!(executions[2].status, ExecutionStatus::Succeeded);
    }

    #[test]
    fn test_is_removable() {
        let running = PipelineExecution {
            id: "e1".to_string(),
            status: ExecutionStatus::Running,
            name: None,
        };
        let failed = PipelineExecution {
            status: ExecutionStatus::Failed,
            ..running.clone()
        };
        let canceled = PipelineExecution {
            status: ExecutionStatus::from("CANCELED"),
            ..running.clone()
        };
        let anonymous = PipelineExecution {
            id: String::new(),
            status: ExecutionStatus::Succeeded,
            ..running.clone()
        };

        assert!(!running.is_removable());
        assert!(failed.is_removable());
        assert!(canceled.is_removable());
        assert!(!anonymous.is_removable());
    }
}
