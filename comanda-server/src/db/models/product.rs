//! Product catalog model (read surface consumed by order creation)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: String,
    pub establishment_id: String,
    pub name: String,
    /// Current catalog price. Orders snapshot this at creation time and are
    /// unaffected by later changes.
    pub price: f64,
    pub active: bool,
    pub created_at: i64,
}
