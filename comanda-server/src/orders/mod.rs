//! Order domain: ledger and settlement
//!
//! - **money**: decimal arithmetic, snapshot building, payment-status
//!   derivation
//! - **ledger**: payment application, lifecycle status, order queries
//! - **settlement**: order creation orchestration (staff + public flows)
//!
//! # Data Flow
//!
//! ```text
//! CreateOrderRequest → SettlementService ── validate catalog/establishment
//!          │                                  │
//!          │              one transaction: order + items
//!          │                (+ payment if pay_now)
//!          │                (+ kitchen ticket if has_kitchen)
//!          ▼                                  │
//!     OrderLedger ◀── apply_payment ──────────┘
//!          │
//!     audit record + bus event
//! ```

pub mod ledger;
pub mod money;
pub mod settlement;

pub use ledger::OrderLedger;
pub use settlement::{CreateOrderRequest, PublicOrderRequest, SettlementService};
