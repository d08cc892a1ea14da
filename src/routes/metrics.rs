use axum::{
    Extension, Json,
    extract::{Query, State},
};

use crate::{
    AppState,
    auth::Identity,
    metrics::MetricsService,
    models::{MetricsRange, MetricsSummary, Role},
};

use super::error::ApiError;

/// Dashboard summary for an inclusive date range.
pub async fn summary(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(range): Query<MetricsRange>,
) -> Result<Json<MetricsSummary>, ApiError> {
    identity.require_role(Role::Viewer)?;

    let service = MetricsService::new(
        state.db.clone(),
        state.config.pricing.default_model.clone(),
    );
    let summary = service.aggregate(range).await?;

    Ok(Json(summary))
}
