use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::models::property::{Property, PropertyCreate, PropertyPatch};
use crate::state::AppState;

fn property_not_found() -> AppError {
    AppError::NotFound("Property not found".to_string())
}

/// POST /properties
pub async fn handle_create_property(
    State(state): State<AppState>,
    Json(req): Json<PropertyCreate>,
) -> Result<(StatusCode, Json<Property>), AppError> {
    req.validate()?;
    let property = state.store.insert_property(&req).await?;
    Ok((StatusCode::CREATED, Json(property)))
}

/// GET /properties
pub async fn handle_list_properties(
    State(state): State<AppState>,
) -> Result<Json<Vec<Property>>, AppError> {
    Ok(Json(state.store.list_properties().await?))
}

/// GET /properties/:id
pub async fn handle_get_property(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Property>, AppError> {
    let property = state
        .store
        .get_property(id)
        .await?
        .ok_or_else(property_not_found)?;
    Ok(Json(property))
}

/// PUT /properties/:id
pub async fn handle_update_property(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<PropertyPatch>,
) -> Result<Json<Property>, AppError> {
    let existing = state
        .store
        .get_property(id)
        .await?
        .ok_or_else(property_not_found)?;
    patch.validate()?;

    let merged = existing.apply(patch);
    let property = state
        .store
        .update_property(&merged)
        .await?
        .ok_or_else(property_not_found)?;
    Ok(Json(property))
}

/// DELETE /properties/:id
pub async fn handle_delete_property(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if !state.store.delete_property(id).await? {
        return Err(property_not_found());
    }
    info!("Deleted property {id}");
    Ok(StatusCode::NO_CONTENT)
}
