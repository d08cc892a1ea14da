use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Stored per-model token pricing.
///
/// Rates are in microcents (1/10000 of a cent) per 1M tokens, matching the
/// internal cost representation. Example: $0.15 per 1M tokens = 150_000.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbModelPricing {
    pub id: Uuid,
    /// Model identifier. Lookups are case-insensitive.
    pub model: String,
    pub provider: String,
    /// Cost per 1M input tokens in microcents
    pub input_per_1m_tokens: i64,
    /// Cost per 1M output tokens in microcents
    pub output_per_1m_tokens: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create or replace pricing for a model.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpsertModelPricing {
    #[validate(length(min = 1, max = 128))]
    pub model: String,
    #[validate(length(min = 1, max = 64))]
    pub provider: String,
    #[validate(range(min = 0))]
    pub input_per_1m_tokens: i64,
    #[validate(range(min = 0))]
    pub output_per_1m_tokens: i64,
}
