//! 通知模块 — 按门店广播的事件总线
//!
//! 由 [`EventBus`] 负责：订单/厨房事件的实时扇出 + 有界的近期事件缓冲。
//! 流式传输 (SSE) 在本 crate 之外，仅消费 `subscribe()` 契约。

mod bus;

pub use bus::{EventBus, DEFAULT_BUFFER_CAPACITY};
