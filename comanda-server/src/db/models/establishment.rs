//! Establishment (tenant) model
//!
//! The core only consumes the gating flags; establishment administration
//! itself lives in the back-office service.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Establishment {
    pub id: String,
    pub name: String,
    /// Inactive establishments reject all order traffic
    pub active: bool,
    /// Spawns a kitchen ticket for every new order when set
    pub has_kitchen: bool,
    /// Gates the public (unauthenticated) ordering flow
    pub online_ordering: bool,
    pub created_at: i64,
}
