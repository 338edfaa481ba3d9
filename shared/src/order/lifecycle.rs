//! Order lifecycle state machine
//!
//! ```text
//! pending ─► confirmed ─► preparing ─► ready ─► served ─┬─► completed
//!    │           │            │          │        │     │
//!    │           │            │          │        │     └─► billed ─► completed
//!    └───────────┴────────────┴──────────┴────────┴──► cancelled
//! ```
//!
//! | From      | Allowed targets                  |
//! |-----------|----------------------------------|
//! | pending   | confirmed, cancelled             |
//! | confirmed | preparing, cancelled             |
//! | preparing | ready, cancelled                 |
//! | ready     | served, cancelled                |
//! | served    | billed, completed, cancelled     |
//! | billed    | completed                        |
//! | completed | (terminal)                       |
//! | cancelled | (terminal)                       |
//!
//! Once the cashier has issued the bill the order can only be settled.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Served,
    Billed,
    Completed,
    Cancelled,
}

/// Why a status change was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("order is already {0}")]
    SameStatus(OrderStatus),
    #[error("order is {0} and can no longer change")]
    Terminal(OrderStatus),
    #[error("cannot move order from {from} to {to}")]
    NotAllowed { from: OrderStatus, to: OrderStatus },
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 8] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Served,
        OrderStatus::Billed,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    /// Statuses reachable in one step
    pub const fn allowed_next(self) -> &'static [OrderStatus] {
        use OrderStatus::*;
        match self {
            Pending => &[Confirmed, Cancelled],
            Confirmed => &[Preparing, Cancelled],
            Preparing => &[Ready, Cancelled],
            Ready => &[Served, Cancelled],
            Served => &[Billed, Completed, Cancelled],
            Billed => &[Completed],
            Completed | Cancelled => &[],
        }
    }

    pub fn can_transition_to(self, target: OrderStatus) -> bool {
        self.allowed_next().contains(&target)
    }

    pub fn check_transition(self, target: OrderStatus) -> Result<(), TransitionError> {
        if self == target {
            return Err(TransitionError::SameStatus(self));
        }
        if self.is_terminal() {
            return Err(TransitionError::Terminal(self));
        }
        if !self.can_transition_to(target) {
            return Err(TransitionError::NotAllowed {
                from: self,
                to: target,
            });
        }
        Ok(())
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Still occupies its table
    pub const fn is_active(self) -> bool {
        !self.is_terminal()
    }

    /// Line items may be replaced (billed freezes the bill)
    pub const fn accepts_item_changes(self) -> bool {
        matches!(
            self,
            OrderStatus::Pending
                | OrderStatus::Confirmed
                | OrderStatus::Preparing
                | OrderStatus::Ready
                | OrderStatus::Served
        )
    }

    /// Position along the main path; `cancelled` sits outside it.
    pub const fn rank(self) -> u8 {
        match self {
            OrderStatus::Pending => 0,
            OrderStatus::Confirmed => 1,
            OrderStatus::Preparing => 2,
            OrderStatus::Ready => 3,
            OrderStatus::Served => 4,
            OrderStatus::Billed => 5,
            OrderStatus::Completed => 6,
            OrderStatus::Cancelled => u8::MAX,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Served => "served",
            OrderStatus::Billed => "billed",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown order status string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown order status: {0}")]
pub struct ParseOrderStatusError(pub String);

impl FromStr for OrderStatus {
    type Err = ParseOrderStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| ParseOrderStatusError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use OrderStatus::*;

    #[test]
    fn test_transition_table() {
        let expected: [(OrderStatus, &[OrderStatus]); 8] = [
            (Pending, &[Confirmed, Cancelled]),
            (Confirmed, &[Preparing, Cancelled]),
            (Preparing, &[Ready, Cancelled]),
            (Ready, &[Served, Cancelled]),
            (Served, &[Billed, Completed, Cancelled]),
            (Billed, &[Completed]),
            (Completed, &[]),
            (Cancelled, &[]),
        ];

        for (from, allowed) in expected {
            for to in OrderStatus::ALL {
                assert_eq!(
                    from.can_transition_to(to),
                    allowed.contains(&to),
                    "{from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn test_non_cancel_transitions_are_monotonic() {
        for from in OrderStatus::ALL {
            for &to in from.allowed_next() {
                if to != Cancelled {
                    assert!(to.rank() > from.rank(), "{from} -> {to} goes backwards");
                }
            }
        }
    }

    #[test]
    fn test_terminal_statuses_never_change() {
        for from in [Completed, Cancelled] {
            assert!(from.is_terminal());
            assert!(!from.is_active());
            assert!(!from.accepts_item_changes());
            for to in OrderStatus::ALL {
                if to != from {
                    assert_eq!(from.check_transition(to), Err(TransitionError::Terminal(from)));
                }
            }
        }
    }

    #[test]
    fn test_check_transition_errors() {
        assert_eq!(
            Ready.check_transition(Ready),
            Err(TransitionError::SameStatus(Ready))
        );
        assert_eq!(
            Pending.check_transition(Served),
            Err(TransitionError::NotAllowed {
                from: Pending,
                to: Served
            })
        );
        assert_eq!(
            Billed.check_transition(Cancelled),
            Err(TransitionError::NotAllowed {
                from: Billed,
                to: Cancelled
            })
        );
        assert_eq!(Served.check_transition(Completed), Ok(()));
        assert_eq!(Billed.check_transition(Completed), Ok(()));
    }

    #[test]
    fn test_item_changes_window() {
        for status in [Pending, Confirmed, Preparing, Ready, Served] {
            assert!(status.accepts_item_changes(), "{status}");
        }
        assert!(!Billed.accepts_item_changes());
        assert!(Billed.is_active());
    }

    #[test]
    fn test_serde_and_parse() {
        assert_eq!(serde_json::to_string(&Preparing).unwrap(), "\"preparing\"");
        let parsed: OrderStatus = serde_json::from_str("\"billed\"").unwrap();
        assert_eq!(parsed, Billed);

        assert_eq!("Served".parse::<OrderStatus>(), Ok(Served));
        assert_eq!(" cancelled ".parse::<OrderStatus>(), Ok(Cancelled));
        assert!("paid".parse::<OrderStatus>().is_err());
    }
}
