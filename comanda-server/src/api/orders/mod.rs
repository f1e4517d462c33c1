//! Order API Module

mod handler;

use axum::routing::{get, patch, post};
use axum::Router;

use crate::core::ServerState;

/// Order router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create).get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/payments", post(handler::apply_payment))
        .route("/{id}/status", patch(handler::update_status))
}
