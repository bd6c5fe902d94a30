//! Per-order nonce status — the replay-protection state machine.
//!
//! ```text
//!              ┌──────────────────┐
//!              ▼                  │ more units
//!   ┌────────┐    ┌──────────────────┐   last unit   ┌───────────────┐
//!   │ UNUSED ├───▶│ PARTIALLY_FILLED ├──────────────▶│ FULLY_EXECUTED│
//!   └───┬────┘    └──────────────────┘               └───────────────┘
//!       │ cancel                         single fill        ▲
//!       ▼                                                   │
//!   ┌───────────┐          UNUSED ─────────────────────────-┘
//!   │ CANCELLED │
//!   └───────────┘
//! ```
//!
//! `FullyExecuted` and `Cancelled` are terminal and sticky. The
//! partially-filled accumulator is keyed by the order's own hash so a
//! differently-shaped order reusing the same nonce cannot collide with an
//! in-flight fill.

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Status of one order nonce for one signer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderNonceStatus {
    /// Never referenced by a settlement or cancellation.
    Unused,
    /// A multi-fill strategy has consumed part of the order's quantity.
    PartiallyFilled {
        /// Hash of the order being filled. A fill against a different
        /// order hash on the same nonce is a replay and is rejected.
        order_hash: B256,
        /// Cumulative units filled so far.
        filled: u128,
    },
    /// Settlement consumed this nonce. Terminal.
    FullyExecuted,
    /// Explicitly cancelled by the signer. Terminal.
    Cancelled,
}

impl OrderNonceStatus {
    /// Whether a fill of the order with `order_hash` is still permitted,
    /// returning the units already filled when it is.
    #[must_use]
    pub fn fillable(&self, order_hash: B256) -> Option<u128> {
        match self {
            Self::Unused => Some(0),
            Self::PartiallyFilled {
                order_hash: h,
                filled,
            } if *h == order_hash => Some(*filled),
            _ => None,
        }
    }

    /// Terminal states admit no further transition.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::FullyExecuted | Self::Cancelled)
    }
}

impl std::fmt::Display for OrderNonceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unused => write!(f, "UNUSED"),
            Self::PartiallyFilled { filled, .. } => write!(f, "PARTIALLY_FILLED({filled})"),
            Self::FullyExecuted => write!(f, "FULLY_EXECUTED"),
            Self::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// All replay-protection state for one signer.
///
/// Created implicitly on first reference; mutated only by successful
/// settlement, explicit cancellation, or global-nonce increment; never
/// physically deleted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserNonces {
    /// Global counter every signed bid must carry to be live.
    pub bid_nonce: u64,
    /// Global counter every signed ask must carry to be live.
    pub ask_nonce: u64,
    /// Cancelled subset nonces, checked at validation time.
    pub cancelled_subsets: HashSet<u64>,
    /// Per-order-nonce status. Absent entries are `Unused`.
    pub order_statuses: HashMap<u64, OrderNonceStatus>,
}

impl UserNonces {
    /// Status of one order nonce (`Unused` when never touched).
    #[must_use]
    pub fn order_status(&self, order_nonce: u64) -> OrderNonceStatus {
        self.order_statuses
            .get(&order_nonce)
            .copied()
            .unwrap_or(OrderNonceStatus::Unused)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash(b: u8) -> B256 {
        B256::repeat_byte(b)
    }

    #[test]
    fn unused_is_fillable_from_zero() {
        assert_eq!(OrderNonceStatus::Unused.fillable(hash(1)), Some(0));
    }

    #[test]
    fn partial_fill_requires_matching_hash() {
        let status = OrderNonceStatus::PartiallyFilled {
            order_hash: hash(1),
            filled: 3,
        };
        assert_eq!(status.fillable(hash(1)), Some(3));
        assert_eq!(status.fillable(hash(2)), None, "hash collision must fail");
    }

    #[test]
    fn terminal_states_not_fillable() {
        assert_eq!(OrderNonceStatus::FullyExecuted.fillable(hash(1)), None);
        assert_eq!(OrderNonceStatus::Cancelled.fillable(hash(1)), None);
        assert!(OrderNonceStatus::FullyExecuted.is_terminal());
        assert!(OrderNonceStatus::Cancelled.is_terminal());
        assert!(!OrderNonceStatus::Unused.is_terminal());
    }

    #[test]
    fn absent_entry_reads_unused() {
        let nonces = UserNonces::default();
        assert_eq!(nonces.order_status(42), OrderNonceStatus::Unused);
    }
}
