//! Admin maintenance operations: age-based purges, factory reset, and demo
//! seeding. All of these are invoked explicitly from the admin surface; there
//! is no background worker deleting data on a timer.

mod seed;

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

pub use seed::SeedSummary;

use crate::db::{DbError, DbPool, DbResult, ResetCounts};

/// Which tables an age-based purge touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurgeKind {
    Executions,
    Faqs,
    All,
}

/// Rows removed by one purge call.
#[derive(Debug, Default, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PurgeOutcome {
    pub executions_deleted: u64,
    pub faqs_deleted: u64,
}

pub struct MaintenanceService {
    db: Arc<DbPool>,
}

impl MaintenanceService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Delete rows strictly older than `days` days. Executions age by
    /// `started_at`, questions by `asked_at`. `days = 0` purges everything
    /// older than this instant.
    pub async fn purge_older_than(&self, kind: PurgeKind, days: i64) -> DbResult<PurgeOutcome> {
        if days < 0 {
            return Err(DbError::Validation(
                "retention days must not be negative".to_string(),
            ));
        }

        let cutoff = Utc::now() - Duration::days(days);
        let mut outcome = PurgeOutcome::default();

        if matches!(kind, PurgeKind::Executions | PurgeKind::All) {
            outcome.executions_deleted = self.db.executions().delete_before(cutoff).await?;
        }
        if matches!(kind, PurgeKind::Faqs | PurgeKind::All) {
            outcome.faqs_deleted = self.db.faqs().delete_before(cutoff).await?;
        }

        tracing::info!(
            kind = ?kind,
            days = days,
            executions = outcome.executions_deleted,
            faqs = outcome.faqs_deleted,
            "Purge complete"
        );

        Ok(outcome)
    }

    /// Wipe all dynamic data (executions, leads, FAQs) in one transaction.
    /// User accounts and pricing survive.
    pub async fn factory_reset(&self) -> DbResult<ResetCounts> {
        let counts = self.db.maintenance().factory_reset().await?;

        tracing::info!(
            executions = counts.executions,
            leads = counts.leads,
            faqs = counts.faqs,
            "Factory reset complete"
        );

        Ok(counts)
    }

    /// Replace all dynamic data with a synthetic demo dataset.
    pub async fn seed_demo_data(&self) -> DbResult<SeedSummary> {
        self.db.maintenance().factory_reset().await?;
        let summary = seed::seed(&self.db).await?;

        tracing::info!(
            executions = summary.executions,
            leads = summary.leads,
            faqs = summary.faqs,
            users = summary.users,
            "Demo data seeded"
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::{
        db::tests::harness::{create_sqlite_pool, run_sqlite_migrations},
        models::{CreateExecution, CreateFaq, ExecutionFilter, ExecutionStatus, FaqFilter},
    };

    async fn create_service() -> (Arc<DbPool>, MaintenanceService) {
        let pool = create_sqlite_pool().await;
        run_sqlite_migrations(&pool).await;
        let db = Arc::new(DbPool::from_sqlite(pool));
        let service = MaintenanceService::new(db.clone());
        (db, service)
    }

    async fn insert_execution(db: &DbPool, age_days: i64) {
        db.executions()
            .create(CreateExecution {
                run_id: Uuid::new_v4().to_string(),
                agent_name: "bot".to_string(),
                model: None,
                status: ExecutionStatus::Success,
                started_at: Utc::now() - Duration::days(age_days),
                finished_at: None,
                duration_ms: None,
                input_tokens: None,
                output_tokens: None,
                total_tokens: None,
                cost_microcents: None,
                lead_id: None,
            })
            .await
            .expect("insert execution");
    }

    async fn insert_faq(db: &DbPool, age_days: i64) {
        db.faqs()
            .create(CreateFaq {
                question: "Hours?".to_string(),
                category: None,
                frequency: None,
                agent_name: None,
                asked_at: Utc::now() - Duration::days(age_days),
            })
            .await
            .expect("insert faq");
    }

    #[tokio::test]
    async fn test_purge_rejects_negative_days() {
        let (_db, service) = create_service().await;
        let result = service.purge_older_than(PurgeKind::All, -1).await;
        assert!(matches!(result, Err(DbError::Validation(_))));
    }

    #[tokio::test]
    async fn test_purge_executions_only() {
        let (db, service) = create_service().await;
        insert_execution(&db, 40).await;
        insert_execution(&db, 5).await;
        insert_faq(&db, 40).await;

        let outcome = service
            .purge_older_than(PurgeKind::Executions, 30)
            .await
            .expect("purge");

        assert_eq!(outcome.executions_deleted, 1);
        assert_eq!(outcome.faqs_deleted, 0);

        let remaining = db
            .executions()
            .list(ExecutionFilter::default())
            .await
            .expect("list");
        assert_eq!(remaining.len(), 1);
    }

    #[tokio::test]
    async fn test_purge_all_touches_both_tables() {
        let (db, service) = create_service().await;
        insert_execution(&db, 40).await;
        insert_faq(&db, 40).await;
        insert_faq(&db, 1).await;

        let outcome = service
            .purge_older_than(PurgeKind::All, 30)
            .await
            .expect("purge");

        assert_eq!(outcome.executions_deleted, 1);
        assert_eq!(outcome.faqs_deleted, 1);
        let faqs = db.faqs().list(FaqFilter::default()).await.expect("list");
        assert_eq!(faqs.len(), 1);
    }

    #[tokio::test]
    async fn test_seed_replaces_existing_data() {
        let (db, service) = create_service().await;
        insert_execution(&db, 1).await;

        let summary = service.seed_demo_data().await.expect("seed");

        assert!(summary.executions > 400);
        assert!(summary.leads > 0);
        assert_eq!(summary.faqs, 8);
        assert_eq!(summary.users, 2);
        assert!(summary.pricing_models > 0);

        // The pre-existing execution was wiped; only seeded rows remain
        let listed = db
            .executions()
            .list(ExecutionFilter {
                limit: Some(10_000),
                ..Default::default()
            })
            .await
            .expect("list");
        assert_eq!(listed.len() as u64, summary.executions);
    }

    #[tokio::test]
    async fn test_seed_is_rerunnable() {
        let (db, service) = create_service().await;

        service.seed_demo_data().await.expect("first seed");
        let summary = service.seed_demo_data().await.expect("second seed");

        // Demo accounts are reused, not duplicated
        assert_eq!(db.users().count().await.expect("count"), 2);
        assert_eq!(summary.users, 2);
    }
}
