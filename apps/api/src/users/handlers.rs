use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::models::user::{User, UserCreate, UserPatch};
use crate::state::AppState;

fn user_not_found() -> AppError {
    AppError::NotFound("User not found".to_string())
}

/// POST /users
pub async fn handle_create_user(
    State(state): State<AppState>,
    Json(req): Json<UserCreate>,
) -> Result<(StatusCode, Json<User>), AppError> {
    req.validate()?;
    if state.store.find_user_by_email(&req.email).await?.is_some() {
        return Err(AppError::Validation("Email already registered".to_string()));
    }

    let user = state.store.insert_user(&req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /users
pub async fn handle_list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(state.store.list_users().await?))
}

/// GET /users/:id
pub async fn handle_get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<User>, AppError> {
    let user = state.store.get_user(id).await?.ok_or_else(user_not_found)?;
    Ok(Json(user))
}

/// PUT /users/:id
pub async fn handle_update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<UserPatch>,
) -> Result<Json<User>, AppError> {
    let existing = state.store.get_user(id).await?.ok_or_else(user_not_found)?;
    patch.validate()?;

    if let Some(email) = &patch.email {
        let taken = state.store.find_user_by_email(email).await?;
        if taken.is_some_and(|other| other.id != id) {
            return Err(AppError::Validation(
                "Email already registered by another user".to_string(),
            ));
        }
    }

    let merged = existing.apply(patch);
    let user = state
        .store
        .update_user(&merged)
        .await?
        .ok_or_else(user_not_found)?;
    Ok(Json(user))
}

/// DELETE /users/:id
pub async fn handle_delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if !state.store.delete_user(id).await? {
        return Err(user_not_found());
    }
    info!("Deleted user {id}");
    Ok(StatusCode::NO_CONTENT)
}
