//! Admin-managed per-model token pricing.

use axum::{
    Extension, Json,
    extract::State,
};
use validator::Validate;

use crate::{
    AppState,
    auth::Identity,
    models::{DbModelPricing, UpsertModelPricing},
};

use super::error::ApiError;

/// List all pricing rows.
pub async fn list(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<DbModelPricing>>, ApiError> {
    identity.require_admin()?;

    let rows = state.db.model_pricing().list().await?;
    Ok(Json(rows))
}

/// Create or replace pricing for a model. Model names match
/// case-insensitively, so "GPT-4o" replaces "gpt-4o".
pub async fn upsert(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<UpsertModelPricing>,
) -> Result<Json<DbModelPricing>, ApiError> {
    identity.require_admin()?;
    req.validate()?;

    let row = state.db.model_pricing().upsert(req).await?;
    tracing::info!(model = %row.model, "Model pricing updated");
    Ok(Json(row))
}
