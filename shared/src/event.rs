//! Bus event types
//!
//! Events published on the per-establishment notification bus. Consumed by
//! the streaming transport (kitchen displays, cashier screens); the
//! transport itself lives outside this crate.

use serde::{Deserialize, Serialize};

use crate::kitchen::TicketStatus;

/// 通知事件 — 按门店 (establishment) 广播
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PosEvent {
    /// New order arrived (public online ordering)
    OrderCreated {
        order_id: String,
        code: Option<String>,
        customer_name: Option<String>,
        total_amount: f64,
        item_count: usize,
    },
    /// A kitchen ticket was spawned for a new order
    TicketCreated {
        ticket_id: String,
        order_id: String,
        ticket_number: i64,
    },
    /// A kitchen ticket moved through the state machine
    TicketStatusChanged {
        ticket_id: String,
        order_id: String,
        ticket_number: i64,
        from: TicketStatus,
        to: TicketStatus,
    },
}

impl PosEvent {
    /// Short tag used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            PosEvent::OrderCreated { .. } => "ORDER_CREATED",
            PosEvent::TicketCreated { .. } => "TICKET_CREATED",
            PosEvent::TicketStatusChanged { .. } => "TICKET_STATUS_CHANGED",
        }
    }
}
