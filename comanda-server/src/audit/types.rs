//! 审计日志类型定义

use serde::{Deserialize, Serialize};

/// 审计操作类型（枚举，非自由文本）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    // ═══ 订单（财务关键）═══
    /// 员工下单
    OrderCreated,
    /// 顾客在线下单（公开流程）
    PublicOrderCreated,
    /// 添加支付
    OrderPaymentAdded,
    /// 订单生命周期状态变更
    OrderStatusChanged,

    // ═══ 厨房 ═══
    /// 厨房工单状态流转
    TicketStatusChanged,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::OrderCreated => "order_created",
            AuditAction::PublicOrderCreated => "public_order_created",
            AuditAction::OrderPaymentAdded => "order_payment_added",
            AuditAction::OrderStatusChanged => "order_status_changed",
            AuditAction::TicketStatusChanged => "ticket_status_changed",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
