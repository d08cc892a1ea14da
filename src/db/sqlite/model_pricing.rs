use async_trait::async_trait;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use uuid::Uuid;

use super::common::parse_uuid;
use crate::{
    db::{error::DbResult, repos::ModelPricingRepo},
    models::{DbModelPricing, UpsertModelPricing},
};

pub struct SqliteModelPricingRepo {
    pool: SqlitePool,
}

impl SqliteModelPricingRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn row_to_pricing(row: SqliteRow) -> DbResult<DbModelPricing> {
    Ok(DbModelPricing {
        id: parse_uuid(&row.get::<String, _>("id"))?,
        model: row.get("model"),
        provider: row.get("provider"),
        input_per_1m_tokens: row.get("input_per_1m_tokens"),
        output_per_1m_tokens: row.get("output_per_1m_tokens"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[async_trait]
impl ModelPricingRepo for SqliteModelPricingRepo {
    async fn upsert(&self, input: UpsertModelPricing) -> DbResult<DbModelPricing> {
        let id = Uuid::new_v4();
        let now = chrono::Utc::now();

        // The model column is COLLATE NOCASE, so "GPT-4o" and "gpt-4o"
        // land on the same row.
        let row = sqlx::query(
            r#"
            INSERT INTO model_pricing (
                id, model, provider, input_per_1m_tokens, output_per_1m_tokens,
                created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(model) DO UPDATE SET
                provider = excluded.provider,
                input_per_1m_tokens = excluded.input_per_1m_tokens,
                output_per_1m_tokens = excluded.output_per_1m_tokens,
                updated_at = excluded.updated_at
            RETURNING id, model, provider, input_per_1m_tokens, output_per_1m_tokens,
                      created_at, updated_at
            "#,
        )
        .bind(id.to_string())
        .bind(&input.model)
        .bind(&input.provider)
        .bind(input.input_per_1m_tokens)
        .bind(input.output_per_1m_tokens)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        row_to_pricing(row)
    }

    async fn list(&self) -> DbResult<Vec<DbModelPricing>> {
        let rows = sqlx::query(
            r#"
            SELECT id, model, provider, input_per_1m_tokens, output_per_1m_tokens,
                   created_at, updated_at
            FROM model_pricing
            ORDER BY model ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_pricing).collect()
    }
}
