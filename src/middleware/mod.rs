//! Session authentication middleware.
//!
//! Every protected route passes through [`require_session`], which resolves
//! the bearer token against the in-memory session store and attaches an
//! [`Identity`] to the request. Role checks happen in the handlers, which
//! state the capability they need explicitly.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{AppState, auth::Identity, routes::ApiError};

/// Middleware that requires a valid `Authorization: Bearer <token>` header.
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&req).ok_or(ApiError::Unauthorized)?;

    let session = state.sessions.get(&token).ok_or(ApiError::Unauthorized)?;

    req.extensions_mut().insert(Identity {
        user_id: session.user_id,
        role: session.role,
    });

    Ok(next.run(req).await)
}

fn bearer_token(req: &Request) -> Option<String> {
    let header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?;

    header
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}
