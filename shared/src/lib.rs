//! Shared types for the Comanda POS system
//!
//! Domain vocabulary used by the server and by clients: order and payment
//! statuses, the kitchen ticket state machine, bus event types, and the
//! request DTOs accepted at the API boundary. This crate performs no I/O.

pub mod event;
pub mod kitchen;
pub mod order;
pub mod util;

// Re-exports
pub use event::PosEvent;
pub use kitchen::TicketStatus;
pub use order::{
    OrderItemInput, OrderStatus, PaymentInput, PaymentMethod, PaymentStatus,
};
pub use serde::{Deserialize, Serialize};
