//! 审计日志模块
//!
//! 财务相关操作 (下单、支付、状态变更) 的不可变记录。
//! 写入是 fire-and-forget：审计失败绝不中断主操作。

mod service;
mod types;

pub use service::{AuditLogRequest, AuditService};
pub use types::AuditAction;
