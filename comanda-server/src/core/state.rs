//! 服务器状态

use std::sync::Arc;

use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;

use crate::audit::AuditService;
use crate::core::Config;
use crate::db::DbService;
use crate::kitchen::KitchenService;
use crate::notify::EventBus;
use crate::orders::{OrderLedger, SettlementService};

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc/池句柄实现浅拷贝，克隆成本极低。领域服务按需构造
/// (字段本身都是句柄)。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | pool | SQLite 连接池 |
/// | event_bus | 按门店广播的事件总线 |
/// | audit | 审计日志句柄 |
/// | shutdown | 关闭信号令牌 |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub event_bus: Arc<EventBus>,
    pub audit: AuditService,
    pub shutdown: CancellationToken,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：数据库 (连接池 + 迁移) → 事件总线 → 审计 worker
    pub async fn initialize(config: &Config) -> Result<Self, crate::utils::AppError> {
        let db = DbService::new(&config.database_path).await?;
        let shutdown = CancellationToken::new();
        let event_bus = Arc::new(EventBus::with_capacity(config.event_buffer_capacity));
        let audit = AuditService::spawn(
            db.pool.clone(),
            config.audit_buffer_size,
            shutdown.clone(),
        );

        Ok(Self {
            config: config.clone(),
            pool: db.pool,
            event_bus,
            audit,
            shutdown,
        })
    }

    pub fn order_ledger(&self) -> OrderLedger {
        OrderLedger::new(self.pool.clone(), self.audit.clone())
    }

    pub fn settlement(&self) -> SettlementService {
        SettlementService::new(
            self.pool.clone(),
            self.audit.clone(),
            self.event_bus.clone(),
            self.order_ledger(),
        )
    }

    pub fn kitchen(&self) -> KitchenService {
        KitchenService::new(
            self.pool.clone(),
            self.audit.clone(),
            self.event_bus.clone(),
            self.config.timezone,
        )
    }

    /// 优雅关闭：通知后台任务、拆除事件总线
    pub fn begin_shutdown(&self) {
        self.shutdown.cancel();
        self.event_bus.shutdown();
    }
}
