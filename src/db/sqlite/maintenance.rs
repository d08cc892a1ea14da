use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::db::{
    error::DbResult,
    repos::{MaintenanceRepo, ResetCounts},
};

pub struct SqliteMaintenanceRepo {
    pool: SqlitePool,
}

impl SqliteMaintenanceRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MaintenanceRepo for SqliteMaintenanceRepo {
    async fn factory_reset(&self) -> DbResult<ResetCounts> {
        let mut tx = self.pool.begin().await?;

        // Executions first: they reference leads.
        let executions = sqlx::query("DELETE FROM executions")
            .execute(&mut *tx)
            .await?
            .rows_affected();
        let leads = sqlx::query("DELETE FROM leads")
            .execute(&mut *tx)
            .await?
            .rows_affected();
        let faqs = sqlx::query("DELETE FROM faqs")
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        Ok(ResetCounts {
            executions,
            leads,
            faqs,
        })
    }
}

#[cfg(test)]
mod tests {
    use sqlx::Row;

    use super::*;
    use crate::db::tests::harness::{create_sqlite_pool, run_sqlite_migrations};

    async fn count(pool: &SqlitePool, table: &str) -> i64 {
        sqlx::query(&format!("SELECT COUNT(*) as count FROM {}", table))
            .fetch_one(pool)
            .await
            .expect("count query")
            .get("count")
    }

    #[tokio::test]
    async fn test_factory_reset_preserves_users_and_pricing() {
        let pool = create_sqlite_pool().await;
        run_sqlite_migrations(&pool).await;

        let now = chrono::Utc::now();
        sqlx::query(
            "INSERT INTO executions (id, run_id, agent_name, status, started_at) \
             VALUES ('e1', 'run-1', 'bot', 'success', ?)",
        )
        .bind(now)
        .execute(&pool)
        .await
        .expect("insert execution");
        sqlx::query(
            "INSERT INTO leads (id, name, email, source, captured_at) \
             VALUES ('l1', 'Jamie', 'j@example.com', 'bot', ?)",
        )
        .bind(now)
        .execute(&pool)
        .await
        .expect("insert lead");
        sqlx::query("INSERT INTO faqs (id, question, asked_at) VALUES ('f1', 'Hours?', ?)")
            .bind(now)
            .execute(&pool)
            .await
            .expect("insert faq");
        sqlx::query(
            "INSERT INTO users (id, email, password_hash, name, role) \
             VALUES ('u1', 'a@example.com', 'hash', 'Admin', 'admin')",
        )
        .execute(&pool)
        .await
        .expect("insert user");
        sqlx::query(
            "INSERT INTO model_pricing (id, model, provider) VALUES ('p1', 'gpt-4o', 'openai')",
        )
        .execute(&pool)
        .await
        .expect("insert pricing");

        let repo = SqliteMaintenanceRepo::new(pool.clone());
        let counts = repo.factory_reset().await.expect("factory_reset");

        assert_eq!(counts.executions, 1);
        assert_eq!(counts.leads, 1);
        assert_eq!(counts.faqs, 1);
        assert_eq!(counts.total(), 3);

        assert_eq!(count(&pool, "executions").await, 0);
        assert_eq!(count(&pool, "leads").await, 0);
        assert_eq!(count(&pool, "faqs").await, 0);
        assert_eq!(count(&pool, "users").await, 1);
        assert_eq!(count(&pool, "model_pricing").await, 1);
    }
}
