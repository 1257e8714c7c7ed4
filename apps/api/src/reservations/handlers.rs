use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Local;
use tracing::info;

use crate::catalog::CatalogStore;
use crate::errors::AppError;
use crate::models::reservation::{
    check_stay_dates, Reservation, ReservationCreate, ReservationPatch,
};
use crate::state::AppState;

fn reservation_not_found() -> AppError {
    AppError::NotFound("Reservation not found".to_string())
}

/// Rejects references to users or properties that do not exist.
async fn check_references(
    store: &dyn CatalogStore,
    user_id: Option<i64>,
    property_id: Option<i64>,
) -> Result<(), AppError> {
    if let Some(user_id) = user_id {
        if store.get_user(user_id).await?.is_none() {
            return Err(AppError::Validation("User does not exist".to_string()));
        }
    }
    if let Some(property_id) = property_id {
        if store.get_property(property_id).await?.is_none() {
            return Err(AppError::Validation("Property does not exist".to_string()));
        }
    }
    Ok(())
}

/// POST /reservations
pub async fn handle_create_reservation(
    State(state): State<AppState>,
    Json(req): Json<ReservationCreate>,
) -> Result<(StatusCode, Json<Reservation>), AppError> {
    check_references(state.store.as_ref(), Some(req.user_id), Some(req.property_id)).await?;
    check_stay_dates(req.check_in_date, req.check_out_date)?;

    let today = Local::now().date_naive();
    let reservation = state.store.insert_reservation(&req, today).await?;
    Ok((StatusCode::CREATED, Json(reservation)))
}

/// GET /reservations
pub async fn handle_list_reservations(
    State(state): State<AppState>,
) -> Result<Json<Vec<Reservation>>, AppError> {
    Ok(Json(state.store.list_reservations().await?))
}

/// GET /reservations/:id
pub async fn handle_get_reservation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Reservation>, AppError> {
    let reservation = state
        .store
        .get_reservation(id)
        .await?
        .ok_or_else(reservation_not_found)?;
    Ok(Json(reservation))
}

/// PUT /reservations/:id
pub async fn handle_update_reservation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<ReservationPatch>,
) -> Result<Json<Reservation>, AppError> {
    let existing = state
        .store
        .get_reservation(id)
        .await?
        .ok_or_else(reservation_not_found)?;
    check_references(state.store.as_ref(), patch.user_id, patch.property_id).await?;

    let merged = existing.apply(patch);
    check_stay_dates(merged.check_in_date, merged.check_out_date)?;

    let reservation = state
        .store
        .update_reservation(&merged)
        .await?
        .ok_or_else(reservation_not_found)?;
    Ok(Json(reservation))
}

/// DELETE /reservations/:id
pub async fn handle_delete_reservation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if !state.store.delete_reservation(id).await? {
        return Err(reservation_not_found());
    }
    info!("Deleted reservation {id}");
    Ok(StatusCode::NO_CONTENT)
}
