use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::middleware::request_id::RequestId;
use crate::models::property::Property;
use crate::recommendation::resolver::recommend_properties;
use crate::state::AppState;

/// GET /users/:id/properties
///
/// Up to five recommended properties for the user, in ascending id order.
pub async fn handle_recommend_properties(
    request_id: RequestId,
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<Property>>, AppError> {
    info!(%request_id, user_id, "Recommendation requested");

    let (store, llm) = (state.store.as_ref(), state.llm.as_ref());
    let properties = recommend_properties(store, llm, user_id).await?;

    info!(%request_id, user_id, count = properties.len(), "Recommendation served");
    Ok(Json(properties))
}
