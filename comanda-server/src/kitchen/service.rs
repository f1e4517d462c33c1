//! Kitchen ticket service

use std::sync::Arc;

use chrono_tz::Tz;
use sqlx::SqlitePool;

use shared::event::PosEvent;
use shared::kitchen::TicketStatus;
use shared::util::now_millis;

use crate::audit::{AuditAction, AuditService};
use crate::db::models::{KitchenStats, TicketDetail};
use crate::db::repository::kitchen_ticket::{self, TicketListFilter};
use crate::db::repository::order;
use crate::notify::EventBus;
use crate::utils::time::today_bounds_millis;
use crate::utils::{AppError, AppResult};

/// Average preparation time looks at this many most recent deliveries
const PREP_TIME_SAMPLE: i64 = 10;

#[derive(Clone)]
pub struct KitchenService {
    pool: SqlitePool,
    audit: AuditService,
    bus: Arc<EventBus>,
    timezone: Tz,
}

impl KitchenService {
    pub fn new(pool: SqlitePool, audit: AuditService, bus: Arc<EventBus>, timezone: Tz) -> Self {
        Self {
            pool,
            audit,
            bus,
            timezone,
        }
    }

    /// Advance a ticket through the state machine.
    ///
    /// A ticket outside the caller's establishment reads as not-found. An
    /// off-table transition is rejected and the stored status is untouched;
    /// the update is additionally predicated on the status just read, so a
    /// concurrent transition surfaces as a conflict instead of clobbering.
    pub async fn update_status(
        &self,
        establishment_id: &str,
        ticket_id: &str,
        new_status: TicketStatus,
        actor: Option<String>,
    ) -> AppResult<TicketDetail> {
        let ticket = kitchen_ticket::find_by_id(&self.pool, establishment_id, ticket_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Kitchen ticket {}", ticket_id)))?;

        let current = ticket.status().map_err(AppError::internal)?;
        if !current.can_transition_to(new_status) {
            return Err(AppError::validation(format!(
                "invalid transition from {} to {}",
                current, new_status
            )));
        }

        let now = now_millis();
        let mut conn = self.pool.acquire().await?;
        let affected = kitchen_ticket::update_status_cas(
            &mut conn,
            ticket_id,
            current.as_str(),
            new_status.as_str(),
            now,
        )
        .await?;
        drop(conn);

        if affected == 0 {
            return Err(AppError::conflict(format!(
                "Kitchen ticket {} was moved concurrently, retry",
                ticket_id
            )));
        }

        self.audit.record(
            AuditAction::TicketStatusChanged,
            "kitchen_ticket",
            ticket_id,
            establishment_id,
            actor,
            serde_json::json!({
                "order_id": ticket.order_id,
                "ticket_number": ticket.ticket_number,
                "from": current.as_str(),
                "to": new_status.as_str(),
            }),
        );

        self.bus.publish(
            establishment_id,
            PosEvent::TicketStatusChanged {
                ticket_id: ticket_id.to_string(),
                order_id: ticket.order_id.clone(),
                ticket_number: ticket.ticket_number,
                from: current,
                to: new_status,
            },
        );

        tracing::info!(
            ticket_id = %ticket_id,
            from = current.as_str(),
            to = new_status.as_str(),
            "Kitchen ticket transitioned"
        );

        self.get(establishment_id, ticket_id).await
    }

    /// Ticket with its order projection
    pub async fn get(&self, establishment_id: &str, ticket_id: &str) -> AppResult<TicketDetail> {
        let ticket = kitchen_ticket::find_by_id(&self.pool, establishment_id, ticket_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Kitchen ticket {}", ticket_id)))?;

        let order_row = order::find_by_id(&self.pool, establishment_id, &ticket.order_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {}", ticket.order_id)))?;
        let items = order::items_for(&self.pool, &ticket.order_id).await?;

        TicketDetail::from_parts(ticket, order_row.code, order_row.customer_name, items)
            .map_err(AppError::internal)
    }

    pub async fn list(
        &self,
        establishment_id: &str,
        filter: &TicketListFilter,
    ) -> AppResult<Vec<TicketDetail>> {
        let rows = kitchen_ticket::list(&self.pool, establishment_id, filter).await?;

        let mut details = Vec::with_capacity(rows.len());
        for row in rows {
            let order_row = order::find_by_id(&self.pool, establishment_id, &row.order_id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Order {}", row.order_id)))?;
            let items = order::items_for(&self.pool, &row.order_id).await?;
            details.push(
                TicketDetail::from_parts(row, order_row.code, order_row.customer_name, items)
                    .map_err(AppError::internal)?,
            );
        }

        Ok(details)
    }

    /// Kitchen board statistics.
    ///
    /// Queue/preparing/ready count everything open; delivered counts only
    /// the current business-timezone calendar day. Average preparation time
    /// is the floored mean over the most recent deliveries, 0 with none.
    pub async fn stats(&self, establishment_id: &str) -> AppResult<KitchenStats> {
        let queue =
            kitchen_ticket::count_by_status(&self.pool, establishment_id, "QUEUE").await?;
        let preparing =
            kitchen_ticket::count_by_status(&self.pool, establishment_id, "PREPARING").await?;
        let ready =
            kitchen_ticket::count_by_status(&self.pool, establishment_id, "READY").await?;

        let (day_start, day_end) = today_bounds_millis(self.timezone);
        let delivered_today = kitchen_ticket::count_delivered_between(
            &self.pool,
            establishment_id,
            day_start,
            day_end,
        )
        .await?;

        let samples = kitchen_ticket::recent_delivered_times(
            &self.pool,
            establishment_id,
            PREP_TIME_SAMPLE,
        )
        .await?;

        let avg_preparation_minutes = if samples.is_empty() {
            0
        } else {
            let total_ms: i64 = samples
                .iter()
                .map(|(created, updated)| (updated - created).max(0))
                .sum();
            (total_ms / samples.len() as i64) / 60_000
        };

        Ok(KitchenStats {
            queue,
            preparing,
            ready,
            delivered_today,
            avg_preparation_minutes,
        })
    }
}
