use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use uuid::Uuid;

use super::common::parse_uuid;
use crate::{
    db::{
        error::{DbError, DbResult},
        repos::ExecutionRepo,
    },
    models::{CreateExecution, Execution, ExecutionFilter, ExecutionStatus},
};

const SELECT_COLUMNS: &str = "id, run_id, agent_name, model, status, started_at, finished_at, \
     duration_ms, input_tokens, output_tokens, total_tokens, cost_microcents, lead_id, created_at";

pub struct SqliteExecutionRepo {
    pool: SqlitePool,
}

impl SqliteExecutionRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn row_to_execution(row: SqliteRow) -> DbResult<Execution> {
    let status: String = row.get("status");
    let lead_id: Option<String> = row.get("lead_id");
    Ok(Execution {
        id: parse_uuid(&row.get::<String, _>("id"))?,
        run_id: row.get("run_id"),
        agent_name: row.get("agent_name"),
        model: row.get("model"),
        status: ExecutionStatus::from_str(&status),
        started_at: row.get("started_at"),
        finished_at: row.get("finished_at"),
        duration_ms: row.get("duration_ms"),
        input_tokens: row.get("input_tokens"),
        output_tokens: row.get("output_tokens"),
        total_tokens: row.get("total_tokens"),
        cost_microcents: row.get("cost_microcents"),
        lead_id: lead_id.as_deref().map(parse_uuid).transpose()?,
        created_at: row.get("created_at"),
    })
}

#[async_trait]
impl ExecutionRepo for SqliteExecutionRepo {
    async fn create(&self, input: CreateExecution) -> DbResult<Execution> {
        let id = Uuid::new_v4();
        let now = chrono::Utc::now();

        sqlx::query(
            r#"
            INSERT INTO executions (
                id, run_id, agent_name, model, status, started_at, finished_at,
                duration_ms, input_tokens, output_tokens, total_tokens,
                cost_microcents, lead_id, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&input.run_id)
        .bind(&input.agent_name)
        .bind(&input.model)
        .bind(input.status.as_str())
        .bind(input.started_at)
        .bind(input.finished_at)
        .bind(input.duration_ms)
        .bind(input.input_tokens)
        .bind(input.output_tokens)
        .bind(input.total_tokens)
        .bind(input.cost_microcents)
        .bind(input.lead_id.map(|l| l.to_string()))
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => DbError::Conflict(
                format!("Execution with run_id '{}' already exists", input.run_id),
            ),
            _ => DbError::from(e),
        })?;

        Ok(Execution {
            id,
            run_id: input.run_id,
            agent_name: input.agent_name,
            model: input.model,
            status: input.status,
            started_at: input.started_at,
            finished_at: input.finished_at,
            duration_ms: input.duration_ms,
            input_tokens: input.input_tokens,
            output_tokens: input.output_tokens,
            total_tokens: input.total_tokens,
            cost_microcents: input.cost_microcents,
            lead_id: input.lead_id,
            created_at: now,
        })
    }

    async fn list(&self, filter: ExecutionFilter) -> DbResult<Vec<Execution>> {
        let mut conditions = Vec::new();
        if filter.start.is_some() {
            conditions.push("started_at >= ?");
        }
        if filter.end.is_some() {
            conditions.push("started_at <= ?");
        }
        if filter.agent.is_some() {
            conditions.push("agent_name = ?");
        }
        if filter.status.is_some() {
            conditions.push("status = ?");
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let query = format!(
            "SELECT {} FROM executions {} ORDER BY started_at DESC LIMIT ?",
            SELECT_COLUMNS, where_clause
        );

        let mut q = sqlx::query(&query);
        if let Some(start) = filter.start {
            q = q.bind(start);
        }
        if let Some(end) = filter.end {
            q = q.bind(end);
        }
        if let Some(ref agent) = filter.agent {
            q = q.bind(agent);
        }
        if let Some(status) = filter.status {
            q = q.bind(status.as_str());
        }
        let rows = q
            .bind(filter.limit.unwrap_or(100))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(row_to_execution).collect()
    }

    async fn list_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<Vec<Execution>> {
        let query = format!(
            "SELECT {} FROM executions WHERE started_at >= ? AND started_at <= ? \
             ORDER BY started_at ASC",
            SELECT_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(row_to_execution).collect()
    }

    async fn delete_before(&self, cutoff: DateTime<Utc>) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM executions WHERE started_at < ?")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
