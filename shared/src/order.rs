//! Order domain types
//!
//! Status enums are stored as SCREAMING_SNAKE_CASE strings in the database
//! and on the wire; `as_str`/`FromStr` round-trip through the same spelling.

use serde::{Deserialize, Serialize};
use validator::Validate;

// ============================================================================
// Order Status (lifecycle axis)
// ============================================================================

/// 订单生命周期状态
///
/// 与 [`PaymentStatus`] 是两条独立的轴：一个订单可以 OPEN 且 PAID
/// （已结清但尚未离桌），也可以 CLOSED 且 PARTIAL（人为关闭）。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// 进行中
    #[default]
    Open,
    /// 已关闭
    Closed,
    /// 已取消
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Open => "OPEN",
            OrderStatus::Closed => "CLOSED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(OrderStatus::Open),
            "CLOSED" => Ok(OrderStatus::Closed),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            other => Err(format!("unknown order status: {}", other)),
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Payment Status (derived axis)
// ============================================================================

/// 支付状态 — 由 paid_amount 对比 total_amount 推导，不单独设置
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// 未支付
    #[default]
    Unpaid,
    /// 部分支付
    Partial,
    /// 已结清
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "UNPAID",
            PaymentStatus::Partial => "PARTIAL",
            PaymentStatus::Paid => "PAID",
        }
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UNPAID" => Ok(PaymentStatus::Unpaid),
            "PARTIAL" => Ok(PaymentStatus::Partial),
            "PAID" => Ok(PaymentStatus::Paid),
            other => Err(format!("unknown payment status: {}", other)),
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Payment Method
// ============================================================================

/// 支付方式
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Card,
    Pix,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Card => "CARD",
            PaymentMethod::Pix => "PIX",
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CASH" => Ok(PaymentMethod::Cash),
            "CARD" => Ok(PaymentMethod::Card),
            "PIX" => Ok(PaymentMethod::Pix),
            other => Err(format!("unknown payment method: {}", other)),
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Input DTOs
// ============================================================================

/// One requested line of a new order.
///
/// Carries only the product reference — name and unit price are resolved
/// against the catalog server-side and snapshotted onto the order item.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderItemInput {
    pub product_id: String,
    /// Quantity, must be positive
    #[validate(range(min = 1, max = 999))]
    pub quantity: i64,
    /// Free-text note for the kitchen ("no onions")
    #[validate(length(max = 200))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Payment to apply against an existing order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInput {
    pub method: PaymentMethod,
    /// Omitted amount settles the order's full total.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
}
