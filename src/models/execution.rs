use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Terminal status of a workflow execution.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Success,
    Error,
}

impl ExecutionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "success" => Self::Success,
            _ => Self::Error,
        }
    }
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded agent workflow run.
///
/// Rows are immutable after insert; they only leave the table through the
/// maintenance purge or a factory reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Execution {
    pub id: Uuid,
    /// Identifier assigned by the upstream workflow engine.
    pub run_id: String,
    pub agent_name: String,
    pub model: Option<String>,
    pub status: ExecutionStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub duration_ms: Option<i64>,
    pub input_tokens: Option<i64>,
    pub output_tokens: Option<i64>,
    pub total_tokens: Option<i64>,
    /// Cost reported by the workflow engine, in microcents.
    /// `None` or 0 means unknown; the estimator fills the gap at read time.
    pub cost_microcents: Option<i64>,
    pub lead_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Request to record an execution.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateExecution {
    #[validate(length(min = 1, max = 128))]
    pub run_id: String,
    #[validate(length(min = 1, max = 128))]
    pub agent_name: String,
    pub model: Option<String>,
    pub status: ExecutionStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub duration_ms: Option<i64>,
    pub input_tokens: Option<i64>,
    pub output_tokens: Option<i64>,
    pub total_tokens: Option<i64>,
    pub cost_microcents: Option<i64>,
    pub lead_id: Option<Uuid>,
}

/// Filters for listing executions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExecutionFilter {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub agent: Option<String>,
    pub status: Option<ExecutionStatus>,
    pub limit: Option<i64>,
}
