//! Kitchen ticket models

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use shared::kitchen::TicketStatus;

use super::order::OrderItemRow;

/// `kitchen_ticket` table row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct KitchenTicketRow {
    pub id: String,
    pub order_id: String,
    pub establishment_id: String,
    /// Sequential per establishment — the number kitchen staff call out
    pub ticket_number: i64,
    pub status: String,
    pub created_at: i64,
    /// Last status change; `updated_at - created_at` feeds the
    /// preparation-time statistics
    pub updated_at: i64,
}

impl KitchenTicketRow {
    pub fn status(&self) -> Result<TicketStatus, String> {
        TicketStatus::from_str(&self.status)
    }
}

/// Ticket with its order projection, as shown on the kitchen display
#[derive(Debug, Clone, Serialize)]
pub struct TicketDetail {
    pub id: String,
    pub order_id: String,
    pub ticket_number: i64,
    pub status: TicketStatus,
    pub created_at: i64,
    pub updated_at: i64,
    pub order_code: Option<String>,
    pub customer_name: Option<String>,
    pub items: Vec<OrderItemRow>,
}

impl TicketDetail {
    pub fn from_parts(
        row: KitchenTicketRow,
        order_code: Option<String>,
        customer_name: Option<String>,
        items: Vec<OrderItemRow>,
    ) -> Result<Self, String> {
        Ok(Self {
            status: row.status()?,
            id: row.id,
            order_id: row.order_id,
            ticket_number: row.ticket_number,
            created_at: row.created_at,
            updated_at: row.updated_at,
            order_code,
            customer_name,
            items,
        })
    }
}

/// Kitchen board statistics
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct KitchenStats {
    pub queue: i64,
    pub preparing: i64,
    pub ready: i64,
    /// Delivered within the current business-timezone calendar day only
    pub delivered_today: i64,
    /// Floored mean over the 10 most recently delivered tickets; 0 when none
    pub avg_preparation_minutes: i64,
}
