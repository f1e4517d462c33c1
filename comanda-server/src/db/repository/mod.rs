//! Repository Module
//!
//! Module-level free functions over `&SqlitePool` (reads) and
//! `&mut SqliteConnection` (writes, so they compose inside one transaction).
//! Every query is scoped by `establishment_id` — tenant isolation is an
//! explicit parameter, never ambient state.

pub mod audit_log;
pub mod establishment;
pub mod kitchen_ticket;
pub mod order;
pub mod payment;
pub mod product;
