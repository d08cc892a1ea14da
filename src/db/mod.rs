mod error;
pub mod repos;
pub mod sqlite;

#[cfg(test)]
pub mod tests;

use std::sync::Arc;

pub use error::{DbError, DbResult};
pub use repos::*;

use crate::config::DatabaseConfig;

/// Cached repository trait objects, created once at startup.
struct CachedRepos {
    executions: Arc<dyn ExecutionRepo>,
    leads: Arc<dyn LeadRepo>,
    faqs: Arc<dyn FaqRepo>,
    users: Arc<dyn UserRepo>,
    model_pricing: Arc<dyn ModelPricingRepo>,
    maintenance: Arc<dyn MaintenanceRepo>,
}

/// SQLite-backed database pool.
///
/// Repositories are cached at construction time to avoid allocation on each
/// access.
pub struct DbPool {
    pool: sqlx::SqlitePool,
    repos: CachedRepos,
}

impl DbPool {
    /// Create a DbPool from an existing SQLite pool.
    /// Primarily useful for testing.
    pub fn from_sqlite(pool: sqlx::SqlitePool) -> Self {
        let repos = CachedRepos {
            executions: Arc::new(sqlite::SqliteExecutionRepo::new(pool.clone())),
            leads: Arc::new(sqlite::SqliteLeadRepo::new(pool.clone())),
            faqs: Arc::new(sqlite::SqliteFaqRepo::new(pool.clone())),
            users: Arc::new(sqlite::SqliteUserRepo::new(pool.clone())),
            model_pricing: Arc::new(sqlite::SqliteModelPricingRepo::new(pool.clone())),
            maintenance: Arc::new(sqlite::SqliteMaintenanceRepo::new(pool.clone())),
        };
        DbPool { pool, repos }
    }

    /// Create a database pool from configuration.
    pub async fn from_config(config: &DatabaseConfig) -> DbResult<Self> {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(
                sqlx::sqlite::SqliteConnectOptions::new()
                    .filename(&config.path)
                    .create_if_missing(config.create_if_missing)
                    .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
                    .busy_timeout(std::time::Duration::from_millis(config.busy_timeout_ms)),
            )
            .await?;

        Ok(Self::from_sqlite(pool))
    }

    /// Run database migrations using sqlx's migration runner.
    /// This automatically creates and manages a _sqlx_migrations table.
    pub async fn run_migrations(&self) -> DbResult<()> {
        tracing::info!("Running SQLite migrations");
        sqlx::migrate!("./migrations_sqlx/sqlite")
            .run(&self.pool)
            .await?;
        tracing::info!("SQLite migrations completed successfully");
        Ok(())
    }

    /// Cheap liveness probe for the health endpoint.
    pub async fn ping(&self) -> DbResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub fn executions(&self) -> Arc<dyn ExecutionRepo> {
        self.repos.executions.clone()
    }

    pub fn leads(&self) -> Arc<dyn LeadRepo> {
        self.repos.leads.clone()
    }

    pub fn faqs(&self) -> Arc<dyn FaqRepo> {
        self.repos.faqs.clone()
    }

    pub fn users(&self) -> Arc<dyn UserRepo> {
        self.repos.users.clone()
    }

    pub fn model_pricing(&self) -> Arc<dyn ModelPricingRepo> {
        self.repos.model_pricing.clone()
    }

    pub fn maintenance(&self) -> Arc<dyn MaintenanceRepo> {
        self.repos.maintenance.clone()
    }
}
