//! Order ledger: payment application and lifecycle status
//!
//! Payment application is the financially critical path: the payment row and
//! the order update commit in one transaction, and the order update is
//! predicated on the previously read `paid_amount` so concurrent
//! settlements cannot lose updates.

use sqlx::SqlitePool;

use shared::order::{OrderStatus, PaymentInput, PaymentStatus};
use shared::util::{new_id, now_millis};

use crate::audit::{AuditAction, AuditService};
use crate::db::models::{OrderDetail, OrderRow, OrderSummary, PaymentRow};
use crate::db::repository::{kitchen_ticket, order, payment};
use crate::orders::money;
use crate::utils::{AppError, AppResult};

pub use crate::db::repository::order::OrderListFilter;

#[derive(Clone)]
pub struct OrderLedger {
    pool: SqlitePool,
    audit: AuditService,
}

impl OrderLedger {
    pub fn new(pool: SqlitePool, audit: AuditService) -> Self {
        Self { pool, audit }
    }

    /// Fully hydrated order (items, payments, ticket) in tenant scope
    pub async fn get(&self, establishment_id: &str, order_id: &str) -> AppResult<OrderDetail> {
        let row = order::find_by_id(&self.pool, establishment_id, order_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {}", order_id)))?;

        self.hydrate(row).await
    }

    pub async fn list(
        &self,
        establishment_id: &str,
        filter: &OrderListFilter,
    ) -> AppResult<Vec<OrderSummary>> {
        let rows = order::list(&self.pool, establishment_id, filter).await?;
        rows.into_iter()
            .map(|row| OrderSummary::from_row(row).map_err(AppError::internal))
            .collect()
    }

    /// Apply a payment to an open, not-yet-settled order.
    ///
    /// An omitted amount settles the order's *full* total — not the
    /// remaining balance. Over-payment is accepted; the derived status
    /// simply reads as paid.
    pub async fn apply_payment(
        &self,
        establishment_id: &str,
        order_id: &str,
        input: PaymentInput,
        actor: Option<String>,
    ) -> AppResult<OrderDetail> {
        let row = order::find_by_id(&self.pool, establishment_id, order_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {}", order_id)))?;

        let payment_status = row.payment_status().map_err(AppError::internal)?;
        if payment_status == PaymentStatus::Paid {
            return Err(AppError::validation(format!(
                "Order {} is already paid",
                order_id
            )));
        }

        let status = row.status().map_err(AppError::internal)?;
        if status == OrderStatus::Cancelled {
            return Err(AppError::validation(format!(
                "Cannot apply payment to cancelled order {}",
                order_id
            )));
        }

        let amount = input.amount.unwrap_or(row.total_amount);
        money::validate_payment_amount(amount)?;

        let new_paid =
            money::to_f64(money::to_decimal(row.paid_amount) + money::to_decimal(amount));
        let new_payment_status = money::payment_status_for(new_paid, row.total_amount);

        let now = now_millis();
        let closed_at = if new_payment_status == PaymentStatus::Paid {
            Some(now)
        } else {
            row.closed_at
        };

        let payment_row = PaymentRow {
            id: new_id(),
            order_id: order_id.to_string(),
            method: input.method.as_str().to_string(),
            amount,
            received_by: actor.clone(),
            received_at: now,
        };

        let mut tx = self.pool.begin().await?;
        payment::insert(&mut tx, &payment_row).await?;

        let affected = order::settle_payment_cas(
            &mut tx,
            order_id,
            row.paid_amount,
            new_paid,
            new_payment_status.as_str(),
            closed_at,
        )
        .await?;

        if affected == 0 {
            tx.rollback().await?;
            return Err(AppError::conflict(format!(
                "Order {} was settled concurrently, retry",
                order_id
            )));
        }

        tx.commit().await?;

        self.audit.record(
            AuditAction::OrderPaymentAdded,
            "order",
            order_id,
            establishment_id,
            actor,
            serde_json::json!({
                "method": payment_row.method,
                "amount": amount,
                "paid_amount": new_paid,
                "payment_status": new_payment_status.as_str(),
            }),
        );

        tracing::info!(
            order_id = %order_id,
            amount = amount,
            payment_status = new_payment_status.as_str(),
            "Payment applied"
        );

        self.get(establishment_id, order_id).await
    }

    /// Set the lifecycle status. Unlike the kitchen ticket machine this is
    /// unrestricted: any target status is accepted. Closing stamps
    /// `closed_at`; every other target clears it.
    pub async fn update_status(
        &self,
        establishment_id: &str,
        order_id: &str,
        new_status: OrderStatus,
        actor: Option<String>,
    ) -> AppResult<OrderDetail> {
        let row = order::find_by_id(&self.pool, establishment_id, order_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {}", order_id)))?;

        let old_status = row.status().map_err(AppError::internal)?;
        let closed_at = if new_status == OrderStatus::Closed {
            Some(now_millis())
        } else {
            None
        };

        let mut conn = self.pool.acquire().await?;
        order::update_status(&mut conn, order_id, new_status.as_str(), closed_at).await?;
        drop(conn);

        self.audit.record(
            AuditAction::OrderStatusChanged,
            "order",
            order_id,
            establishment_id,
            actor,
            serde_json::json!({
                "from": old_status.as_str(),
                "to": new_status.as_str(),
            }),
        );

        self.get(establishment_id, order_id).await
    }

    pub(crate) async fn hydrate(&self, row: OrderRow) -> AppResult<OrderDetail> {
        let items = order::items_for(&self.pool, &row.id).await?;
        let payments = payment::list_by_order(&self.pool, &row.id).await?;
        let ticket = kitchen_ticket::find_by_order(&self.pool, &row.id).await?;

        OrderDetail::from_parts(row, items, payments, ticket).map_err(AppError::internal)
    }
}
