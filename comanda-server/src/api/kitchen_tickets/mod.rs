//! Kitchen Ticket API Module

mod handler;

use axum::routing::{get, patch};
use axum::Router;

use crate::core::ServerState;

/// Kitchen ticket router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/kitchen-tickets", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/stats", get(handler::stats))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/status", patch(handler::update_status))
}
