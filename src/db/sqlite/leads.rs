use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use uuid::Uuid;

use super::common::parse_uuid;
use crate::{
    db::{error::DbResult, repos::LeadRepo},
    models::{CreateLead, Lead, LeadFilter},
};

pub struct SqliteLeadRepo {
    pool: SqlitePool,
}

impl SqliteLeadRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn row_to_lead(row: SqliteRow) -> DbResult<Lead> {
    Ok(Lead {
        id: parse_uuid(&row.get::<String, _>("id"))?,
        name: row.get("name"),
        email: row.get("email"),
        phone: row.get("phone"),
        source: row.get("source"),
        summary: row.get("summary"),
        captured_at: row.get("captured_at"),
        created_at: row.get("created_at"),
    })
}

#[async_trait]
impl LeadRepo for SqliteLeadRepo {
    async fn create(&self, input: CreateLead) -> DbResult<Lead> {
        let id = Uuid::new_v4();
        let now = chrono::Utc::now();

        sqlx::query(
            r#"
            INSERT INTO leads (id, name, email, phone, source, summary, captured_at, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.source)
        .bind(&input.summary)
        .bind(input.captured_at)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Lead {
            id,
            name: input.name,
            email: input.email,
            phone: input.phone,
            source: input.source,
            summary: input.summary,
            captured_at: input.captured_at,
            created_at: now,
        })
    }

    async fn list(&self, filter: LeadFilter) -> DbResult<Vec<Lead>> {
        let mut conditions = Vec::new();
        if filter.start.is_some() {
            conditions.push("captured_at >= ?");
        }
        if filter.end.is_some() {
            conditions.push("captured_at <= ?");
        }
        if filter.source.is_some() {
            conditions.push("source = ?");
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let query = format!(
            "SELECT id, name, email, phone, source, summary, captured_at, created_at \
             FROM leads {} ORDER BY captured_at DESC LIMIT ?",
            where_clause
        );

        let mut q = sqlx::query(&query);
        if let Some(start) = filter.start {
            q = q.bind(start);
        }
        if let Some(end) = filter.end {
            q = q.bind(end);
        }
        if let Some(ref source) = filter.source {
            q = q.bind(source);
        }
        let rows = q
            .bind(filter.limit.unwrap_or(100))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(row_to_lead).collect()
    }

    async fn count_captured_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<i64> {
        let row = sqlx::query(
            "SELECT COUNT(*) as count FROM leads WHERE captured_at >= ? AND captured_at <= ?",
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get::<i64, _>("count"))
    }

    async fn count_recorded_since(&self, since: DateTime<Utc>) -> DbResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM leads WHERE created_at >= ?")
            .bind(since)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get::<i64, _>("count"))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::db::tests::harness::{create_sqlite_pool, run_sqlite_migrations};

    async fn create_test_pool() -> SqlitePool {
        let pool = create_sqlite_pool().await;
        run_sqlite_migrations(&pool).await;
        pool
    }

    fn lead_input(email: &str, source: &str, captured_at: DateTime<Utc>) -> CreateLead {
        CreateLead {
            name: "Jamie Doe".to_string(),
            email: email.to_string(),
            phone: Some("+1-555-0100".to_string()),
            source: source.to_string(),
            summary: None,
            captured_at,
        }
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let pool = create_test_pool().await;
        let repo = SqliteLeadRepo::new(pool);

        let now = Utc::now();
        repo.create(lead_input("a@example.com", "support-bot", now))
            .await
            .expect("Failed to create lead");

        let listed = repo.list(LeadFilter::default()).await.expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].email, "a@example.com");
    }

    #[tokio::test]
    async fn test_list_filters_by_source() {
        let pool = create_test_pool().await;
        let repo = SqliteLeadRepo::new(pool);

        let now = Utc::now();
        repo.create(lead_input("a@example.com", "support-bot", now))
            .await
            .expect("create");
        repo.create(lead_input("b@example.com", "sales-bot", now))
            .await
            .expect("create");

        let listed = repo
            .list(LeadFilter {
                source: Some("sales-bot".to_string()),
                ..Default::default()
            })
            .await
            .expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].email, "b@example.com");
    }

    #[tokio::test]
    async fn test_count_captured_between() {
        let pool = create_test_pool().await;
        let repo = SqliteLeadRepo::new(pool);

        let now = Utc::now();
        repo.create(lead_input("old@example.com", "bot", now - Duration::days(10)))
            .await
            .expect("create");
        repo.create(lead_input("new@example.com", "bot", now))
            .await
            .expect("create");

        let count = repo
            .count_captured_between(now - Duration::days(1), now)
            .await
            .expect("count");
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_count_recorded_since() {
        let pool = create_test_pool().await;
        let repo = SqliteLeadRepo::new(pool);

        // captured_at is old but created_at is now; the "today" counter keys
        // off created_at
        let now = Utc::now();
        repo.create(lead_input("x@example.com", "bot", now - Duration::days(30)))
            .await
            .expect("create");

        let count = repo
            .count_recorded_since(now - Duration::minutes(1))
            .await
            .expect("count");
        assert_eq!(count, 1);
    }
}
