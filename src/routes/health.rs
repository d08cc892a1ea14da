//! Health check endpoint for probes and uptime monitoring.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::AppState;

use super::error::ApiError;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    /// "healthy" or "unhealthy"
    pub status: String,
    /// Service version
    pub version: String,
    /// Whether the database answered a probe query
    pub database: bool,
}

/// Health check with a live database probe.
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthStatus>, ApiError> {
    let database = state.db.ping().await.is_ok();

    Ok(Json(HealthStatus {
        status: if database { "healthy" } else { "unhealthy" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
    }))
}
