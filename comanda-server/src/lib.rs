//! Comanda POS Server - 多租户餐厅点单/收银后端
//!
//! # 架构概述
//!
//! - **订单账本** (`orders::ledger`): 支付应用、支付状态推导、生命周期
//! - **结算协调** (`orders::settlement`): 下单 + 立即支付 + 厨房工单，单事务
//! - **厨房状态机** (`kitchen`): 工单状态流转 + 备餐统计
//! - **事件总线** (`notify`): 按门店广播，有界环形缓冲
//! - **审计日志** (`audit`): 财务操作的 fire-and-forget 记录
//! - **HTTP API** (`api`): RESTful 接口，身份上下文来自上游网关
//!
//! # 模块结构
//!
//! ```text
//! comanda-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── orders/        # 订单账本与结算
//! ├── kitchen/       # 厨房工单状态机
//! ├── notify/        # 事件总线
//! ├── audit/         # 审计日志
//! ├── db/            # 数据库层 (sqlx/SQLite)
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod audit;
pub mod core;
pub mod db;
pub mod kitchen;
pub mod notify;
pub mod orders;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerState};
pub use kitchen::KitchenService;
pub use notify::EventBus;
pub use orders::{OrderLedger, SettlementService};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
