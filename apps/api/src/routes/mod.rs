pub mod health;

use axum::{routing::get, Router};

use crate::properties::handlers as properties;
use crate::recommendation::handlers as recommendation;
use crate::reservations::handlers as reservations;
use crate::state::AppState;
use crate::users::handlers as users;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Users
        .route(
            "/users",
            get(users::handle_list_users).post(users::handle_create_user),
        )
        .route(
            "/users/:id",
            get(users::handle_get_user)
                .put(users::handle_update_user)
                .delete(users::handle_delete_user),
        )
        .route(
            "/users/:id/properties",
            get(recommendation::handle_recommend_properties),
        )
        // Properties
        .route(
            "/properties",
            get(properties::handle_list_properties).post(properties::handle_create_property),
        )
        .route(
            "/properties/:id",
            get(properties::handle_get_property)
                .put(properties::handle_update_property)
                .delete(properties::handle_delete_property),
        )
        // Reservations
        .route(
            "/reservations",
            get(reservations::handle_list_reservations)
                .post(reservations::handle_create_reservation),
        )
        .route(
            "/reservations/:id",
            get(reservations::handle_get_reservation)
                .put(reservations::handle_update_reservation)
                .delete(reservations::handle_delete_reservation),
        )
        .with_state(state)
}
