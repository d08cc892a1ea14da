//! Admin user management.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    AppState,
    auth::{Identity, password},
    models::{CreateUserRecord, CreateUserRequest, UpdateUserRecord, UpdateUserRequest, User},
};

use super::error::ApiError;

pub async fn list(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<User>>, ApiError> {
    identity.require_admin()?;

    let users = state.db.users().list().await?;
    Ok(Json(users))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    identity.require_admin()?;
    req.validate()?;

    let password_hash = password::hash_password(&req.password)?;
    let user = state
        .db
        .users()
        .create(CreateUserRecord {
            email: req.email,
            password_hash,
            name: req.name,
            role: req.role,
        })
        .await?;

    tracing::info!(user_id = %user.id, role = %user.role, "User created");
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiError> {
    identity.require_admin()?;

    let user = state
        .db
        .users()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
    Ok(Json(user))
}

/// Update a user's name or role. A role change revokes the user's live
/// sessions so stale capabilities cannot linger.
pub async fn update(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<User>, ApiError> {
    identity.require_admin()?;
    req.validate()?;

    let role_changed = req.role.is_some();
    let user = state
        .db
        .users()
        .update(
            id,
            UpdateUserRecord {
                name: req.name,
                role: req.role,
                password_hash: None,
            },
        )
        .await?;

    if role_changed {
        state.sessions.revoke_for_user(user.id);
    }

    Ok(Json(user))
}

/// Delete a user. Self-deletion is rejected so an admin cannot lock the
/// team out of its last account by accident.
pub async fn delete(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    identity.require_admin()?;

    if id == identity.user_id {
        return Err(ApiError::Validation(
            "you cannot delete your own account".to_string(),
        ));
    }

    state.db.users().delete(id).await?;
    state.sessions.revoke_for_user(id);

    tracing::info!(user_id = %id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}
