use axum::{
    Extension, Json,
    extract::{Query, State},
};

use crate::{
    AppState,
    auth::Identity,
    faq,
    models::{FaqFilter, FaqGroup, Role},
};

use super::error::ApiError;

/// List grouped questions, most frequent first.
///
/// Agent/search filters apply to the raw rows before grouping, so filtered
/// listings report frequencies within the filter, not table-wide counts.
pub async fn list(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(filter): Query<FaqFilter>,
) -> Result<Json<Vec<FaqGroup>>, ApiError> {
    identity.require_role(Role::Viewer)?;

    let rows = state.db.faqs().list(filter).await?;
    let groups = faq::dedupe(&rows, faq::LISTING_LIMIT);
    Ok(Json(groups))
}
