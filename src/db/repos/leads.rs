use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    db::error::DbResult,
    models::{CreateLead, Lead, LeadFilter},
};

/// Repository for captured leads.
#[async_trait]
pub trait LeadRepo: Send + Sync {
    async fn create(&self, input: CreateLead) -> DbResult<Lead>;

    /// List leads matching the filter, most recently captured first.
    async fn list(&self, filter: LeadFilter) -> DbResult<Vec<Lead>>;

    /// Count leads with `captured_at` inside `[start, end]`.
    async fn count_captured_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<i64>;

    /// Count leads recorded (`created_at`) at or after the given instant.
    async fn count_recorded_since(&self, since: DateTime<Utc>) -> DbResult<i64>;
}
