//! Admin maintenance surface: purge, factory reset, demo seed.

use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::{
    AppState,
    auth::Identity,
    maintenance::{MaintenanceService, PurgeKind, PurgeOutcome, SeedSummary},
};

use super::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurgeRequest {
    pub kind: PurgeKind,
    /// Rows strictly older than this many days are deleted.
    pub older_than_days: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetResponse {
    pub executions_deleted: u64,
    pub leads_deleted: u64,
    pub faqs_deleted: u64,
    pub total_deleted: u64,
}

pub async fn purge(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<PurgeRequest>,
) -> Result<Json<PurgeOutcome>, ApiError> {
    identity.require_admin()?;

    let service = MaintenanceService::new(state.db.clone());
    let outcome = service.purge_older_than(req.kind, req.older_than_days).await?;
    Ok(Json(outcome))
}

pub async fn factory_reset(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<ResetResponse>, ApiError> {
    identity.require_admin()?;

    let service = MaintenanceService::new(state.db.clone());
    let counts = service.factory_reset().await?;
    Ok(Json(ResetResponse {
        executions_deleted: counts.executions,
        leads_deleted: counts.leads,
        faqs_deleted: counts.faqs,
        total_deleted: counts.total(),
    }))
}

pub async fn seed_demo(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<SeedSummary>, ApiError> {
    identity.require_admin()?;

    let service = MaintenanceService::new(state.db.clone());
    let summary = service.seed_demo_data().await?;
    Ok(Json(summary))
}
