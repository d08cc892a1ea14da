use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    db::error::DbResult,
    models::{CreateExecution, Execution, ExecutionFilter},
};

/// Repository for the execution log.
#[async_trait]
pub trait ExecutionRepo: Send + Sync {
    /// Record an execution. `run_id` must be unique across the table.
    async fn create(&self, input: CreateExecution) -> DbResult<Execution>;

    /// List executions matching the filter, newest first.
    async fn list(&self, filter: ExecutionFilter) -> DbResult<Vec<Execution>>;

    /// Fetch all executions with `started_at` inside `[start, end]`.
    async fn list_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<Vec<Execution>>;

    /// Delete executions with `started_at` strictly before the cutoff.
    /// Returns the number of rows deleted.
    async fn delete_before(&self, cutoff: DateTime<Utc>) -> DbResult<u64>;
}
