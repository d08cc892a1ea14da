use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use uuid::Uuid;

use super::common::parse_uuid;
use crate::{
    db::{error::DbResult, repos::FaqRepo},
    models::{CreateFaq, Faq, FaqFilter},
};

pub struct SqliteFaqRepo {
    pool: SqlitePool,
}

impl SqliteFaqRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn row_to_faq(row: SqliteRow) -> DbResult<Faq> {
    Ok(Faq {
        id: parse_uuid(&row.get::<String, _>("id"))?,
        question: row.get("question"),
        category: row.get("category"),
        frequency: row.get("frequency"),
        agent_name: row.get("agent_name"),
        asked_at: row.get("asked_at"),
        created_at: row.get("created_at"),
    })
}

#[async_trait]
impl FaqRepo for SqliteFaqRepo {
    async fn create(&self, input: CreateFaq) -> DbResult<Faq> {
        let id = Uuid::new_v4();
        let now = chrono::Utc::now();

        sqlx::query(
            r#"
            INSERT INTO faqs (id, question, category, frequency, agent_name, asked_at, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&input.question)
        .bind(&input.category)
        .bind(input.frequency)
        .bind(&input.agent_name)
        .bind(input.asked_at)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Faq {
            id,
            question: input.question,
            category: input.category,
            frequency: input.frequency,
            agent_name: input.agent_name,
            asked_at: input.asked_at,
            created_at: now,
        })
    }

    async fn list(&self, filter: FaqFilter) -> DbResult<Vec<Faq>> {
        let mut conditions = Vec::new();
        if filter.agent.is_some() {
            conditions.push("agent_name = ?");
        }
        if filter.search.is_some() {
            conditions.push("question LIKE ? ESCAPE '\\'");
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let query = format!(
            "SELECT id, question, category, frequency, agent_name, asked_at, created_at \
             FROM faqs {} ORDER BY asked_at DESC",
            where_clause
        );

        let mut q = sqlx::query(&query);
        if let Some(ref agent) = filter.agent {
            q = q.bind(agent);
        }
        if let Some(ref search) = filter.search {
            let escaped = search.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
            q = q.bind(format!("%{}%", escaped));
        }
        let rows = q.fetch_all(&self.pool).await?;

        rows.into_iter().map(row_to_faq).collect()
    }

    async fn list_asked_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<Vec<Faq>> {
        let rows = sqlx::query(
            r#"
            SELECT id, question, category, frequency, agent_name, asked_at, created_at
            FROM faqs
            WHERE asked_at >= ? AND asked_at <= ?
            ORDER BY asked_at DESC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_faq).collect()
    }

    async fn delete_before(&self, cutoff: DateTime<Utc>) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM faqs WHERE asked_at < ?")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
