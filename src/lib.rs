//! agentdesk: analytics and CRM backend for teams operating automated AI
//! agent workflows.
//!
//! The server answers dashboard queries (spend, success rates, lead capture,
//! frequent questions) over an execution log written by the workflow engine,
//! and exposes admin maintenance operations for that log. All analytics are
//! computed per request from SQLite; there are no background aggregation
//! jobs.

pub mod auth;
pub mod config;
pub mod db;
pub mod faq;
pub mod maintenance;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod pricing;
pub mod routes;

use std::sync::Arc;

use auth::SessionStore;
use config::AppConfig;
use db::DbPool;

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbPool>,
    pub sessions: Arc<SessionStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(db: Arc<DbPool>, config: AppConfig) -> Self {
        let sessions = Arc::new(SessionStore::new(config.auth.session_ttl_secs));
        Self {
            db,
            sessions,
            config: Arc::new(config),
        }
    }
}
