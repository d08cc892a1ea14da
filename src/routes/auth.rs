//! Login, logout, identity echo, and self-service password change.

use axum::{
    Extension, Json,
    extract::State,
    http::{HeaderMap, StatusCode, header},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    AppState,
    auth::{Identity, password},
    models::{ChangePasswordRequest, Role, UpdateUserRecord},
};

use super::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: MeResponse,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
}

/// Exchange credentials for a bearer token.
///
/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state
        .db
        .users()
        .get_by_email(&req.email)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        return Err(ApiError::Unauthorized);
    }

    state.db.users().record_login(user.id).await?;
    let session = state.sessions.create(user.id, user.role);

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(LoginResponse {
        token: session.token,
        expires_at: session.expires_at,
        user: MeResponse {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
        },
    }))
}

/// Revoke the session presented in the Authorization header.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> StatusCode {
    if let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    {
        state.sessions.revoke(token.trim());
    }
    StatusCode::NO_CONTENT
}

/// Return the caller's account.
pub async fn me(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<MeResponse>, ApiError> {
    let user = state
        .db
        .users()
        .get_by_id(identity.user_id)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    Ok(Json(MeResponse {
        id: user.id,
        email: user.email,
        name: user.name,
        role: user.role,
    }))
}

/// Change the caller's own password. Requires the current password and a
/// matching confirmation; all other sessions for the user are revoked.
pub async fn change_password(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<StatusCode, ApiError> {
    req.validate()?;

    if req.new_password != req.confirm_password {
        return Err(ApiError::Validation(
            "password confirmation does not match".to_string(),
        ));
    }

    let user = state
        .db
        .users()
        .get_by_id(identity.user_id)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    if !password::verify_password(&req.current_password, &user.password_hash)? {
        return Err(ApiError::Validation(
            "current password is incorrect".to_string(),
        ));
    }

    let password_hash = password::hash_password(&req.new_password)?;
    state
        .db
        .users()
        .update(
            user.id,
            UpdateUserRecord {
                password_hash: Some(password_hash),
                ..Default::default()
            },
        )
        .await?;

    state.sessions.revoke_for_user(user.id);
    tracing::info!(user_id = %user.id, "Password changed");

    Ok(StatusCode::NO_CONTENT)
}
