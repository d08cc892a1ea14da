use async_trait::async_trait;

use crate::db::error::DbResult;

/// Row counts removed by a factory reset.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ResetCounts {
    pub executions: u64,
    pub leads: u64,
    pub faqs: u64,
}

impl ResetCounts {
    pub fn total(&self) -> u64 {
        self.executions + self.leads + self.faqs
    }
}

/// Destructive whole-table operations.
#[async_trait]
pub trait MaintenanceRepo: Send + Sync {
    /// Delete all executions, leads, and FAQs inside a single transaction.
    /// Users and pricing are untouched.
    async fn factory_reset(&self) -> DbResult<ResetCounts>;
}
