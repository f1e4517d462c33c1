//! Public ordering handlers

use axum::extract::{Path, State};
use axum::Json;

use crate::core::ServerState;
use crate::db::models::{OrderDetail, Product};
use crate::db::repository::{establishment, product};
use crate::orders::PublicOrderRequest;
use crate::utils::{ok, AppError, AppResponse, AppResult};

/// GET /api/public/:establishment_id/menu - Active products
pub async fn menu(
    State(state): State<ServerState>,
    Path(establishment_id): Path<String>,
) -> AppResult<Json<AppResponse<Vec<Product>>>> {
    let est = establishment::find_by_id(&state.pool, &establishment_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Establishment {}", establishment_id)))?;

    if !est.active || !est.online_ordering {
        return Err(AppError::not_found(format!(
            "Establishment {}",
            establishment_id
        )));
    }

    let products = product::list_active(&state.pool, &establishment_id).await?;
    Ok(ok(products))
}

/// POST /api/public/:establishment_id/orders - Place a customer order
pub async fn create_order(
    State(state): State<ServerState>,
    Path(establishment_id): Path<String>,
    Json(request): Json<PublicOrderRequest>,
) -> AppResult<Json<AppResponse<OrderDetail>>> {
    let order = state
        .settlement()
        .create_public_order(&establishment_id, request)
        .await?;
    Ok(ok(order))
}
