//! Per-establishment event bus
//!
//! # 架构
//!
//! ```text
//! publish(est, event) ──▶ DashMap<establishment_id, TenantChannel>
//!                              │
//!                              ├─▶ broadcast::Sender ──▶ live subscribers
//!                              └─▶ ring buffer (cap 100) ─▶ recent() for
//!                                                          late subscribers
//! ```
//!
//! The bus is an explicitly-owned component: constructed once at startup,
//! carried in `ServerState`, shut down when the server stops. Nothing here
//! is process-global.

use std::collections::VecDeque;
use std::sync::Mutex;

use dashmap::DashMap;
use shared::event::PosEvent;
use tokio::sync::broadcast;

/// Ring buffer capacity per establishment
pub const DEFAULT_BUFFER_CAPACITY: usize = 100;

/// Live channel capacity (slow subscribers miss events rather than
/// back-pressuring publishers)
const CHANNEL_CAPACITY: usize = 256;

struct TenantChannel {
    tx: broadcast::Sender<PosEvent>,
    /// Most recent events, oldest first, bounded
    recent: Mutex<VecDeque<PosEvent>>,
}

impl TenantChannel {
    fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            tx,
            recent: Mutex::new(VecDeque::new()),
        }
    }
}

/// 事件总线 — 按 establishment 扇出
pub struct EventBus {
    channels: DashMap<String, TenantChannel>,
    buffer_capacity: usize,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_BUFFER_CAPACITY)
    }

    pub fn with_capacity(buffer_capacity: usize) -> Self {
        Self {
            channels: DashMap::new(),
            buffer_capacity,
        }
    }

    /// Publish an event to an establishment's channel.
    ///
    /// Never fails: with no live subscribers the event is only recorded in
    /// the ring buffer.
    pub fn publish(&self, establishment_id: &str, event: PosEvent) {
        let channel = self
            .channels
            .entry(establishment_id.to_string())
            .or_insert_with(TenantChannel::new);

        {
            let mut recent = channel.recent.lock().expect("event ring poisoned");
            if recent.len() == self.buffer_capacity {
                recent.pop_front();
            }
            recent.push_back(event.clone());
        }

        tracing::debug!(
            establishment_id = %establishment_id,
            event = event.kind(),
            "Event published"
        );

        // Err means no live receivers — the ring already has the event
        let _ = channel.tx.send(event);
    }

    /// Subscribe to an establishment's live event stream
    pub fn subscribe(&self, establishment_id: &str) -> broadcast::Receiver<PosEvent> {
        self.channels
            .entry(establishment_id.to_string())
            .or_insert_with(TenantChannel::new)
            .tx
            .subscribe()
    }

    /// Recent events (oldest first), for late subscribers catching up
    pub fn recent(&self, establishment_id: &str) -> Vec<PosEvent> {
        self.channels
            .get(establishment_id)
            .map(|c| c.recent.lock().expect("event ring poisoned").iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Drop all channels and buffered events. Subscribers see their stream
    /// close.
    pub fn shutdown(&self) {
        self.channels.clear();
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
