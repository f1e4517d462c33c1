//! Order models: raw rows and the hydrated projections returned by the API
//!
//! Status columns are stored as SCREAMING_SNAKE_CASE text; rows keep them as
//! raw strings and the detail projections parse them into the shared enums.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use shared::order::{OrderStatus, PaymentMethod, PaymentStatus};

use super::kitchen_ticket::KitchenTicketRow;

/// `orders` table row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderRow {
    pub id: String,
    pub establishment_id: String,
    pub code: Option<String>,
    pub customer_name: Option<String>,
    pub status: String,
    pub payment_status: String,
    pub total_amount: f64,
    pub paid_amount: f64,
    pub created_by: Option<String>,
    pub created_at: i64,
    pub closed_at: Option<i64>,
}

impl OrderRow {
    pub fn status(&self) -> Result<OrderStatus, String> {
        OrderStatus::from_str(&self.status)
    }

    pub fn payment_status(&self) -> Result<PaymentStatus, String> {
        PaymentStatus::from_str(&self.payment_status)
    }
}

/// `order_item` table row — immutable snapshot taken at order creation
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderItemRow {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub note: Option<String>,
}

/// `payment` table row — append-only
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PaymentRow {
    pub id: String,
    pub order_id: String,
    pub method: String,
    pub amount: f64,
    pub received_by: Option<String>,
    pub received_at: i64,
}

impl PaymentRow {
    pub fn method(&self) -> Result<PaymentMethod, String> {
        PaymentMethod::from_str(&self.method)
    }
}

/// List projection (no children)
#[derive(Debug, Clone, Serialize)]
pub struct OrderSummary {
    pub id: String,
    pub code: Option<String>,
    pub customer_name: Option<String>,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub total_amount: f64,
    pub paid_amount: f64,
    pub created_at: i64,
    pub closed_at: Option<i64>,
}

impl OrderSummary {
    pub fn from_row(row: OrderRow) -> Result<Self, String> {
        Ok(Self {
            status: row.status()?,
            payment_status: row.payment_status()?,
            id: row.id,
            code: row.code,
            customer_name: row.customer_name,
            total_amount: row.total_amount,
            paid_amount: row.paid_amount,
            created_at: row.created_at,
            closed_at: row.closed_at,
        })
    }
}

/// Fully hydrated order: items, payment ledger, and the kitchen ticket if
/// one was spawned.
#[derive(Debug, Clone, Serialize)]
pub struct OrderDetail {
    pub id: String,
    pub establishment_id: String,
    pub code: Option<String>,
    pub customer_name: Option<String>,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub total_amount: f64,
    pub paid_amount: f64,
    pub created_by: Option<String>,
    pub created_at: i64,
    pub closed_at: Option<i64>,
    pub items: Vec<OrderItemRow>,
    pub payments: Vec<PaymentRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket: Option<KitchenTicketRow>,
}

impl OrderDetail {
    pub fn from_parts(
        row: OrderRow,
        items: Vec<OrderItemRow>,
        payments: Vec<PaymentRow>,
        ticket: Option<KitchenTicketRow>,
    ) -> Result<Self, String> {
        Ok(Self {
            status: row.status()?,
            payment_status: row.payment_status()?,
            id: row.id,
            establishment_id: row.establishment_id,
            code: row.code,
            customer_name: row.customer_name,
            total_amount: row.total_amount,
            paid_amount: row.paid_amount,
            created_by: row.created_by,
            created_at: row.created_at,
            closed_at: row.closed_at,
            items,
            payments,
            ticket,
        })
    }
}
