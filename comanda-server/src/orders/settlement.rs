//! Settlement: order creation as one atomic unit
//!
//! Composes catalog validation, total computation, optional immediate
//! payment, and the kitchen ticket spawn into a single transaction, for
//! both the staff flow and the public (unauthenticated customer) flow.
//! Any validation failure aborts before the transaction opens; a
//! transaction failure leaves nothing behind.

use std::sync::Arc;

use serde::Deserialize;
use sqlx::SqlitePool;
use validator::Validate;

use shared::event::PosEvent;
use shared::kitchen::TicketStatus;
use shared::order::{OrderItemInput, OrderStatus, PaymentMethod, PaymentStatus};
use shared::util::{new_id, now_millis};

use crate::audit::{AuditAction, AuditService};
use crate::db::models::{Establishment, KitchenTicketRow, OrderDetail, OrderItemRow, OrderRow, PaymentRow};
use crate::db::repository::{establishment, kitchen_ticket, order, payment, product};
use crate::notify::EventBus;
use crate::orders::ledger::OrderLedger;
use crate::orders::money;
use crate::utils::{AppError, AppResult};

/// Staff order creation request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, message = "order must contain at least one item"), nested)]
    pub items: Vec<OrderItemInput>,
    /// Optional human-readable code (table number, tab name)
    #[validate(length(max = 40))]
    pub code: Option<String>,
    #[validate(length(max = 120))]
    pub customer_name: Option<String>,
    /// Settle the full total immediately at creation
    #[serde(default)]
    pub pay_now: bool,
    /// Method for the immediate payment; defaults to cash
    pub payment_method: Option<PaymentMethod>,
}

/// Public (customer-facing) order creation request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PublicOrderRequest {
    #[validate(length(min = 1, message = "order must contain at least one item"), nested)]
    pub items: Vec<OrderItemInput>,
    #[validate(length(max = 120))]
    pub customer_name: Option<String>,
}

#[derive(Clone)]
pub struct SettlementService {
    pool: SqlitePool,
    audit: AuditService,
    bus: Arc<EventBus>,
    ledger: OrderLedger,
}

impl SettlementService {
    pub fn new(
        pool: SqlitePool,
        audit: AuditService,
        bus: Arc<EventBus>,
        ledger: OrderLedger,
    ) -> Self {
        Self {
            pool,
            audit,
            bus,
            ledger,
        }
    }

    /// Staff flow: establishment must be active
    pub async fn create_order(
        &self,
        establishment_id: &str,
        request: CreateOrderRequest,
        actor: Option<String>,
    ) -> AppResult<OrderDetail> {
        request.validate()?;

        let est = self.resolve_establishment(establishment_id).await?;

        let pay_now_method = request
            .pay_now
            .then(|| request.payment_method.unwrap_or(PaymentMethod::Cash));

        self.create_internal(
            &est,
            &request.items,
            request.code,
            request.customer_name,
            actor,
            pay_now_method,
            false,
        )
        .await
    }

    /// Public flow: additionally requires online ordering to be enabled.
    /// A disabled or inactive establishment is reported as not-found, never
    /// as a hint that it exists.
    pub async fn create_public_order(
        &self,
        establishment_id: &str,
        request: PublicOrderRequest,
    ) -> AppResult<OrderDetail> {
        request.validate()?;

        let est = self.resolve_establishment(establishment_id).await?;
        if !est.online_ordering {
            return Err(AppError::not_found(format!(
                "Establishment {}",
                establishment_id
            )));
        }

        self.create_internal(
            &est,
            &request.items,
            None,
            request.customer_name,
            None,
            None,
            true,
        )
        .await
    }

    async fn resolve_establishment(&self, id: &str) -> AppResult<Establishment> {
        let est = establishment::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Establishment {}", id)))?;

        if !est.active {
            return Err(AppError::not_found(format!("Establishment {}", id)));
        }

        Ok(est)
    }

    #[allow(clippy::too_many_arguments)]
    async fn create_internal(
        &self,
        est: &Establishment,
        items: &[OrderItemInput],
        code: Option<String>,
        customer_name: Option<String>,
        created_by: Option<String>,
        pay_now_method: Option<PaymentMethod>,
        public: bool,
    ) -> AppResult<OrderDetail> {
        // Every distinct requested product must resolve to an active product
        // of this establishment — otherwise the whole order is rejected.
        let requested_ids = money::distinct_product_ids(items);
        let products =
            product::find_active_by_ids(&self.pool, &est.id, &requested_ids).await?;
        if products.len() != requested_ids.len() {
            return Err(AppError::validation(
                "One or more products are not available",
            ));
        }

        let (snapshots, total_amount) = money::build_snapshots(&products, items)?;

        let now = now_millis();
        let order_id = new_id();

        let (payment_status, paid_amount, closed_at) = match pay_now_method {
            Some(_) => (PaymentStatus::Paid, total_amount, Some(now)),
            None => (PaymentStatus::Unpaid, 0.0, None),
        };

        let order_row = OrderRow {
            id: order_id.clone(),
            establishment_id: est.id.clone(),
            code: code.clone(),
            customer_name: customer_name.clone(),
            status: OrderStatus::Open.as_str().to_string(),
            payment_status: payment_status.as_str().to_string(),
            total_amount,
            paid_amount,
            created_by,
            created_at: now,
            closed_at,
        };

        let mut tx = self.pool.begin().await?;

        order::insert(&mut tx, &order_row).await?;

        for snapshot in &snapshots {
            let item_row = OrderItemRow {
                id: new_id(),
                order_id: order_id.clone(),
                product_id: snapshot.product_id.clone(),
                product_name: snapshot.product_name.clone(),
                quantity: snapshot.quantity,
                unit_price: snapshot.unit_price,
                note: snapshot.note.clone(),
            };
            order::insert_item(&mut tx, &item_row).await?;
        }

        if let Some(method) = pay_now_method {
            let payment_row = PaymentRow {
                id: new_id(),
                order_id: order_id.clone(),
                method: method.as_str().to_string(),
                amount: total_amount,
                received_by: order_row.created_by.clone(),
                received_at: now,
            };
            payment::insert(&mut tx, &payment_row).await?;
        }

        let ticket = if est.has_kitchen {
            let ticket_number = kitchen_ticket::next_ticket_number(&mut tx, &est.id).await?;
            let ticket_row = KitchenTicketRow {
                id: new_id(),
                order_id: order_id.clone(),
                establishment_id: est.id.clone(),
                ticket_number,
                status: TicketStatus::Queue.as_str().to_string(),
                created_at: now,
                updated_at: now,
            };
            kitchen_ticket::insert(&mut tx, &ticket_row).await?;
            Some(ticket_row)
        } else {
            None
        };

        tx.commit().await?;

        let action = if public {
            AuditAction::PublicOrderCreated
        } else {
            AuditAction::OrderCreated
        };
        self.audit.record(
            action,
            "order",
            &order_id,
            &est.id,
            order_row.created_by.clone(),
            serde_json::json!({
                "total_amount": total_amount,
                "item_count": snapshots.len(),
                "payment_status": payment_status.as_str(),
                "ticket_number": ticket.as_ref().map(|t| t.ticket_number),
            }),
        );

        if public {
            self.bus.publish(
                &est.id,
                PosEvent::OrderCreated {
                    order_id: order_id.clone(),
                    code: code.clone(),
                    customer_name: customer_name.clone(),
                    total_amount,
                    item_count: snapshots.len(),
                },
            );
        } else if let Some(t) = &ticket {
            self.bus.publish(
                &est.id,
                PosEvent::TicketCreated {
                    ticket_id: t.id.clone(),
                    order_id: order_id.clone(),
                    ticket_number: t.ticket_number,
                },
            );
        }

        tracing::info!(
            order_id = %order_id,
            establishment_id = %est.id,
            total_amount = total_amount,
            public = public,
            "Order created"
        );

        self.ledger.get(&est.id, &order_id).await
    }
}
