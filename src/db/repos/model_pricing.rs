use async_trait::async_trait;

use crate::{
    db::error::DbResult,
    models::{DbModelPricing, UpsertModelPricing},
};

/// Repository for per-model token pricing.
#[async_trait]
pub trait ModelPricingRepo: Send + Sync {
    /// Insert pricing for a model, replacing any existing row for the same
    /// model name.
    async fn upsert(&self, input: UpsertModelPricing) -> DbResult<DbModelPricing>;

    /// List all pricing rows, ordered by model name.
    async fn list(&self) -> DbResult<Vec<DbModelPricing>>;
}
