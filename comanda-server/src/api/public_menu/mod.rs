//! Public ordering API
//!
//! Unauthenticated, customer-facing: browse the menu and place an order.
//! Gated per establishment by the `online_ordering` flag; a disabled or
//! inactive establishment reads as not-found.

mod handler;

use axum::routing::{get, post};
use axum::Router;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/public/{establishment_id}", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/menu", get(handler::menu))
        .route("/orders", post(handler::create_order))
}
