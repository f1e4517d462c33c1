//! Kitchen ticket state machine
//!
//! The only hard-gated workflow in the system. Forward flow is
//! QUEUE → PREPARING → READY → DELIVERED, with single-step backward
//! corrections and a QUEUE → DELIVERED fast path for items that need no
//! preparation (pre-made drinks). Arbitrary jumps are rejected so that
//! preparation-time statistics stay meaningful.

use serde::{Deserialize, Serialize};

/// 厨房工单状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    /// 排队中
    #[default]
    Queue,
    /// 制作中
    Preparing,
    /// 待取餐
    Ready,
    /// 已交付
    Delivered,
}

impl TicketStatus {
    /// The transition table. `Delivered` is not terminal: a delivered ticket
    /// can be reopened back to `Queue` for corrections.
    pub fn allowed_next(self) -> &'static [TicketStatus] {
        match self {
            TicketStatus::Queue => &[TicketStatus::Preparing, TicketStatus::Delivered],
            TicketStatus::Preparing => &[TicketStatus::Ready, TicketStatus::Queue],
            TicketStatus::Ready => &[TicketStatus::Delivered, TicketStatus::Preparing],
            TicketStatus::Delivered => &[TicketStatus::Queue],
        }
    }

    pub fn can_transition_to(self, next: TicketStatus) -> bool {
        self.allowed_next().contains(&next)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Queue => "QUEUE",
            TicketStatus::Preparing => "PREPARING",
            TicketStatus::Ready => "READY",
            TicketStatus::Delivered => "DELIVERED",
        }
    }
}

impl std::str::FromStr for TicketStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "QUEUE" => Ok(TicketStatus::Queue),
            "PREPARING" => Ok(TicketStatus::Preparing),
            "READY" => Ok(TicketStatus::Ready),
            "DELIVERED" => Ok(TicketStatus::Delivered),
            other => Err(format!("unknown ticket status: {}", other)),
        }
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::TicketStatus::*;
    use super::*;
    use std::str::FromStr;

    const ALL: [TicketStatus; 4] = [Queue, Preparing, Ready, Delivered];

    /// Exhaustive check of all 16 (from, to) pairs against the table.
    #[test]
    fn transition_table_is_exact() {
        let allowed = [
            (Queue, Preparing),
            (Queue, Delivered),
            (Preparing, Ready),
            (Preparing, Queue),
            (Ready, Delivered),
            (Ready, Preparing),
            (Delivered, Queue),
        ];

        for from in ALL {
            for to in ALL {
                let expected = allowed.contains(&(from, to));
                assert_eq!(
                    from.can_transition_to(to),
                    expected,
                    "{} -> {} should be {}",
                    from,
                    to,
                    if expected { "allowed" } else { "rejected" }
                );
            }
        }
    }

    #[test]
    fn no_self_transitions() {
        for s in ALL {
            assert!(!s.can_transition_to(s));
        }
    }

    #[test]
    fn ready_cannot_skip_back_to_queue() {
        assert!(!Ready.can_transition_to(Queue));
    }

    #[test]
    fn status_strings_round_trip() {
        for s in ALL {
            assert_eq!(TicketStatus::from_str(s.as_str()).unwrap(), s);
        }
        assert!(TicketStatus::from_str("COOKING").is_err());
    }
}
