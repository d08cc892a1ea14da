use axum::{
    Extension, Json,
    extract::{Query, State},
};

use crate::{
    AppState,
    auth::Identity,
    models::{Lead, LeadFilter, Role},
};

use super::error::ApiError;

/// List captured leads, most recent first, with optional range/source filters.
pub async fn list(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(filter): Query<LeadFilter>,
) -> Result<Json<Vec<Lead>>, ApiError> {
    identity.require_role(Role::Viewer)?;

    let leads = state.db.leads().list(filter).await?;
    Ok(Json(leads))
}
