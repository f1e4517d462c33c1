//! Database row models and read projections

pub mod establishment;
pub mod kitchen_ticket;
pub mod order;
pub mod product;

pub use establishment::Establishment;
pub use kitchen_ticket::{KitchenStats, KitchenTicketRow, TicketDetail};
pub use order::{OrderDetail, OrderItemRow, OrderRow, OrderSummary, PaymentRow};
pub use product::Product;
