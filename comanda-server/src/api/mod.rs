//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`orders`] - 订单管理接口 (员工)
//! - [`kitchen_tickets`] - 厨房工单接口
//! - [`public_menu`] - 公开点餐接口 (无需身份)
//!
//! 身份上下文 (租户 + 操作者) 由上游网关通过请求头传入，见 [`context`]。

pub mod context;
pub mod health;
pub mod kitchen_tickets;
pub mod orders;
pub mod public_menu;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

/// Assemble the full application router
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(orders::router())
        .merge(kitchen_tickets::router())
        .merge(public_menu::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
