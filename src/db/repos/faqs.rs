use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    db::error::DbResult,
    models::{CreateFaq, Faq, FaqFilter},
};

/// Repository for logged questions.
#[async_trait]
pub trait FaqRepo: Send + Sync {
    async fn create(&self, input: CreateFaq) -> DbResult<Faq>;

    /// List raw question rows matching the filter, most recently asked first.
    /// Grouping happens in the deduplicator, not here.
    async fn list(&self, filter: FaqFilter) -> DbResult<Vec<Faq>>;

    /// Fetch all questions with `asked_at` inside `[start, end]`.
    async fn list_asked_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<Vec<Faq>>;

    /// Delete questions with `asked_at` strictly before the cutoff.
    async fn delete_before(&self, cutoff: DateTime<Utc>) -> DbResult<u64>;
}
