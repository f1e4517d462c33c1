//! Order API Handlers
//!
//! Thin layer: parse query/body, convert business-timezone dates to millis,
//! delegate to the services.

use std::str::FromStr;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use shared::order::{OrderStatus, PaymentInput, PaymentStatus};

use crate::api::context::RequestContext;
use crate::core::ServerState;
use crate::db::models::{OrderDetail, OrderSummary};
use crate::orders::ledger::OrderListFilter;
use crate::orders::CreateOrderRequest;
use crate::utils::time::{day_end_millis, day_start_millis, parse_date};
use crate::utils::{ok, AppError, AppResponse, AppResult};

/// Query params for listing orders
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub payment_status: Option<String>,
    /// Inclusive start date (YYYY-MM-DD, business timezone)
    pub from: Option<String>,
    /// Inclusive end date (YYYY-MM-DD, business timezone)
    pub to: Option<String>,
    /// Substring match on code / customer name
    pub search: Option<String>,
}

impl ListQuery {
    fn into_filter(self, tz: chrono_tz::Tz) -> AppResult<OrderListFilter> {
        // Reject unknown status values up front instead of returning an
        // empty list for a typo.
        if let Some(s) = &self.status {
            OrderStatus::from_str(s).map_err(AppError::validation)?;
        }
        if let Some(s) = &self.payment_status {
            PaymentStatus::from_str(s).map_err(AppError::validation)?;
        }

        let from_millis = self
            .from
            .as_deref()
            .map(|d| parse_date(d).map(|d| day_start_millis(d, tz)))
            .transpose()?;
        let to_millis = self
            .to
            .as_deref()
            .map(|d| parse_date(d).map(|d| day_end_millis(d, tz)))
            .transpose()?;

        Ok(OrderListFilter {
            status: self.status,
            payment_status: self.payment_status,
            from_millis,
            to_millis,
            search: self.search,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// POST /api/orders - Create an order (staff flow)
pub async fn create(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Json(request): Json<CreateOrderRequest>,
) -> AppResult<Json<AppResponse<OrderDetail>>> {
    let order = state
        .settlement()
        .create_order(&ctx.establishment_id, request, ctx.user_id)
        .await?;
    Ok(ok(order))
}

/// GET /api/orders - List orders with filters
pub async fn list(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<AppResponse<Vec<OrderSummary>>>> {
    let filter = query.into_filter(state.config.timezone)?;
    let orders = state
        .order_ledger()
        .list(&ctx.establishment_id, &filter)
        .await?;
    Ok(ok(orders))
}

/// GET /api/orders/:id - Get a single order with items/payments/ticket
pub async fn get_by_id(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<OrderDetail>>> {
    let order = state.order_ledger().get(&ctx.establishment_id, &id).await?;
    Ok(ok(order))
}

/// POST /api/orders/:id/payments - Apply a payment
///
/// Omitted amount settles the order's full total.
pub async fn apply_payment(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Json(input): Json<PaymentInput>,
) -> AppResult<Json<AppResponse<OrderDetail>>> {
    let order = state
        .order_ledger()
        .apply_payment(&ctx.establishment_id, &id, input, ctx.user_id)
        .await?;
    Ok(ok(order))
}

/// PATCH /api/orders/:id/status - Update lifecycle status
pub async fn update_status(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> AppResult<Json<AppResponse<OrderDetail>>> {
    let order = state
        .order_ledger()
        .update_status(&ctx.establishment_id, &id, request.status, ctx.user_id)
        .await?;
    Ok(ok(order))
}
