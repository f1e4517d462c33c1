//! 审计日志服务
//!
//! `AuditService` 是一个轻量句柄：通过 mpsc 通道把日志请求交给后台
//! worker，由 worker 异步写入 `audit_log` 表。
//!
//! 关键语义：`record()` 永不阻塞、永不失败 —— 通道已满或写入失败只记
//! tracing::warn，主事务照常提交。

use shared::util::now_millis;
use sqlx::SqlitePool;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::types::AuditAction;
use crate::db::repository::audit_log::{self, NewAuditLog};

/// 发送到 worker 的日志请求
#[derive(Debug)]
pub struct AuditLogRequest {
    pub action: AuditAction,
    pub resource_type: String,
    pub resource_id: String,
    pub establishment_id: String,
    pub operator_id: Option<String>,
    pub details: serde_json::Value,
}

/// 审计日志句柄 — 克隆后分发给各 service
#[derive(Clone)]
pub struct AuditService {
    tx: mpsc::Sender<AuditLogRequest>,
}

impl std::fmt::Debug for AuditService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditService").finish_non_exhaustive()
    }
}

impl AuditService {
    /// 创建服务并启动后台 worker
    pub fn spawn(pool: SqlitePool, buffer_size: usize, shutdown: CancellationToken) -> Self {
        let (tx, rx) = mpsc::channel(buffer_size);
        tokio::spawn(worker(pool, rx, shutdown));
        Self { tx }
    }

    /// 记录一条审计日志 (fire-and-forget)
    pub fn record(
        &self,
        action: AuditAction,
        resource_type: &str,
        resource_id: &str,
        establishment_id: &str,
        operator_id: Option<String>,
        details: serde_json::Value,
    ) {
        let request = AuditLogRequest {
            action,
            resource_type: resource_type.to_string(),
            resource_id: resource_id.to_string(),
            establishment_id: establishment_id.to_string(),
            operator_id,
            details,
        };

        if let Err(e) = self.tx.try_send(request) {
            tracing::warn!(action = %action, error = %e, "Audit log dropped (queue full or worker gone)");
        }
    }
}

/// 后台 worker — 顺序消费通道并写库
async fn worker(
    pool: SqlitePool,
    mut rx: mpsc::Receiver<AuditLogRequest>,
    shutdown: CancellationToken,
) {
    loop {
        let request = tokio::select! {
            biased;
            r = rx.recv() => match r {
                Some(r) => r,
                None => break,
            },
            _ = shutdown.cancelled() => {
                // Drain whatever is already queued, then stop
                while let Ok(r) = rx.try_recv() {
                    write_entry(&pool, r).await;
                }
                break;
            }
        };

        write_entry(&pool, request).await;
    }

    tracing::debug!("Audit worker stopped");
}

async fn write_entry(pool: &SqlitePool, request: AuditLogRequest) {
    let entry = NewAuditLog {
        timestamp: now_millis(),
        action: request.action.as_str().to_string(),
        resource_type: request.resource_type,
        resource_id: request.resource_id,
        establishment_id: request.establishment_id,
        operator_id: request.operator_id,
        details: Some(request.details.to_string()),
    };

    if let Err(e) = audit_log::insert(pool, &entry).await {
        tracing::warn!(action = %entry.action, error = %e, "Failed to write audit log");
    }
}
