//! Kitchen Ticket API Handlers

use std::str::FromStr;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use shared::kitchen::TicketStatus;

use crate::api::context::RequestContext;
use crate::core::ServerState;
use crate::db::models::{KitchenStats, TicketDetail};
use crate::kitchen::TicketListFilter;
use crate::utils::time::{day_end_millis, day_start_millis, parse_date};
use crate::utils::{ok, AppError, AppResponse, AppResult};

/// Query params for listing tickets
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    /// Inclusive start date (YYYY-MM-DD, business timezone)
    pub from: Option<String>,
    /// Inclusive end date (YYYY-MM-DD, business timezone)
    pub to: Option<String>,
    pub limit: Option<i64>,
}

impl ListQuery {
    fn into_filter(self, tz: chrono_tz::Tz) -> AppResult<TicketListFilter> {
        if let Some(s) = &self.status {
            TicketStatus::from_str(s).map_err(AppError::validation)?;
        }
        if let Some(limit) = self.limit {
            if limit <= 0 {
                return Err(AppError::validation("limit must be positive"));
            }
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

        Ok(TicketListFilter {
            status: self.status,
            from_millis,
            to_millis,
            limit: self.limit,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: TicketStatus,
}

/// GET /api/kitchen-tickets - List tickets for the kitchen board
pub async fn list(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<AppResponse<Vec<TicketDetail>>>> {
    let filter = query.into_filter(state.config.timezone)?;
    let tickets = state.kitchen().list(&ctx.establishment_id, &filter).await?;
    Ok(ok(tickets))
}

/// GET /api/kitchen-tickets/stats - Kitchen board statistics
pub async fn stats(
    State(state): State<ServerState>,
    ctx: RequestContext,
) -> AppResult<Json<AppResponse<KitchenStats>>> {
    let stats = state.kitchen().stats(&ctx.establishment_id).await?;
    Ok(ok(stats))
}

/// GET /api/kitchen-tickets/:id - Get a single ticket
pub async fn get_by_id(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<TicketDetail>>> {
    let ticket = state.kitchen().get(&ctx.establishment_id, &id).await?;
    Ok(ok(ticket))
}

/// PATCH /api/kitchen-tickets/:id/status - Advance the state machine
pub async fn update_status(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> AppResult<Json<AppResponse<TicketDetail>>> {
    let ticket = state
        .kitchen()
        .update_status(&ctx.establishment_id, &id, request.status, ctx.user_id)
        .await?;
    Ok(ok(ticket))
}
