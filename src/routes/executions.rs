use axum::{
    Extension, Json,
    extract::{Query, State},
};

use crate::{
    AppState,
    auth::Identity,
    models::{Execution, ExecutionFilter, Role},
};

use super::error::ApiError;

/// List executions, newest first, with optional range/agent/status filters.
pub async fn list(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(filter): Query<ExecutionFilter>,
) -> Result<Json<Vec<Execution>>, ApiError> {
    identity.require_role(Role::Viewer)?;

    let executions = state.db.executions().list(filter).await?;
    Ok(Json(executions))
}
