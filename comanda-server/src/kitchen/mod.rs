//! Kitchen workflow: ticket transitions and board statistics
//!
//! The transition table itself lives in `shared::kitchen` so clients can
//! render valid next actions; this module enforces it against storage.

mod service;

pub use service::KitchenService;
pub use crate::db::repository::kitchen_ticket::TicketListFilter;
