//! Nonce ledger — exclusive owner of per-signer replay-protection state.
//!
//! Three granularities:
//! - **Global** per-side counters: incrementing one invalidates every
//!   order of that side signed against the old counter value.
//! - **Subset** nonces: a cancelled subset invalidates every order
//!   carrying it, checked at validation time rather than stored per-order.
//! - **Order** nonces: the per-order state machine in
//!   [`OrderNonceStatus`], including the partial-fill accumulator.
//!
//! Validation order for an incoming order: (1) global-nonce match,
//! (2) subset nonce not cancelled, (3) order-nonce status permits the
//! fill. Any of these failing is a [`OpenswapError::WrongNonces`].

use std::collections::HashMap;

use alloy_primitives::{Address, B256};
use openswap_types::{MakerOrder, OpenswapError, OrderNonceStatus, QuoteType, Result, UserNonces};

/// Per-signer nonce state store. Single-writer; all mutation goes through
/// the settlement engine.
#[derive(Debug, Default)]
pub struct NonceLedger {
    users: HashMap<Address, UserNonces>,
}

impl NonceLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a signer's nonce state (default state when never touched).
    #[must_use]
    pub fn user(&self, signer: Address) -> UserNonces {
        self.users.get(&signer).cloned().unwrap_or_default()
    }

    /// Run the three nonce checks for an incoming order, returning the
    /// units already filled on its order nonce.
    ///
    /// # Errors
    /// [`OpenswapError::WrongNonces`] on any replay-protection failure.
    pub fn validate_order(&self, maker: &MakerOrder, order_hash: B256) -> Result<u128> {
        let user = self.users.get(&maker.signer);

        let (bid_nonce, ask_nonce) = user.map_or((0, 0), |u| (u.bid_nonce, u.ask_nonce));
        let expected = match maker.quote_type {
            QuoteType::Bid => bid_nonce,
            QuoteType::Ask => ask_nonce,
        };
        if maker.global_nonce != expected {
            return Err(OpenswapError::WrongNonces);
        }

        if user.is_some_and(|u| u.cancelled_subsets.contains(&maker.subset_nonce)) {
            return Err(OpenswapError::WrongNonces);
        }

        let status = user.map_or(OrderNonceStatus::Unused, |u| {
            u.order_status(maker.order_nonce)
        });
        status.fillable(order_hash).ok_or(OpenswapError::WrongNonces)
    }

    /// Record a successful fill on an order nonce.
    ///
    /// Single-fill strategies pass `fully_consumed = true` and move the
    /// nonce straight to `FullyExecuted`; multi-fill strategies accumulate
    /// under the order hash until the budget is exhausted.
    pub fn record_fill(
        &mut self,
        signer: Address,
        order_nonce: u64,
        order_hash: B256,
        filled_total: u128,
        fully_consumed: bool,
    ) {
        let status = if fully_consumed {
            OrderNonceStatus::FullyExecuted
        } else {
            OrderNonceStatus::PartiallyFilled {
                order_hash,
                filled: filled_total,
            }
        };
        self.users
            .entry(signer)
            .or_default()
            .order_statuses
            .insert(order_nonce, status);
    }

    /// Restore a prior order-nonce status (batch unwind path).
    pub fn restore_status(&mut self, signer: Address, order_nonce: u64, prior: OrderNonceStatus) {
        let user = self.users.entry(signer).or_default();
        if prior == OrderNonceStatus::Unused {
            user.order_statuses.remove(&order_nonce);
        } else {
            user.order_statuses.insert(order_nonce, prior);
        }
    }

    /// Cancel a list of order nonces for `signer`. Idempotent: already
    /// terminal nonces are left untouched.
    ///
    /// # Errors
    /// [`OpenswapError::LengthsInvalid`] for an empty list.
    pub fn cancel_order_nonces(&mut self, signer: Address, nonces: &[u64]) -> Result<()> {
        if nonces.is_empty() {
            return Err(OpenswapError::LengthsInvalid);
        }
        let user = self.users.entry(signer).or_default();
        for &nonce in nonces {
            let status = user.order_status(nonce);
            if !status.is_terminal() {
                user.order_statuses.insert(nonce, OrderNonceStatus::Cancelled);
            }
        }
        tracing::info!(%signer, count = nonces.len(), "order nonces cancelled");
        Ok(())
    }

    /// Cancel a list of subset nonces for `signer`, invalidating every
    /// order carrying one of them regardless of order-nonce value.
    ///
    /// # Errors
    /// [`OpenswapError::LengthsInvalid`] for an empty list.
    pub fn cancel_subset_nonces(&mut self, signer: Address, nonces: &[u64]) -> Result<()> {
        if nonces.is_empty() {
            return Err(OpenswapError::LengthsInvalid);
        }
        let user = self.users.entry(signer).or_default();
        user.cancelled_subsets.extend(nonces.iter().copied());
        tracing::info!(%signer, count = nonces.len(), "subset nonces cancelled");
        Ok(())
    }

    /// Bump the signer's global bid and/or ask counters, invalidating
    /// every order of the bumped side signed against the old value.
    ///
    /// Returns the new `(bid_nonce, ask_nonce)` pair.
    ///
    /// # Errors
    /// [`OpenswapError::LengthsInvalid`] when neither side is bumped.
    pub fn increment_nonces(&mut self, signer: Address, bid: bool, ask: bool) -> Result<(u64, u64)> {
        if !bid && !ask {
            return Err(OpenswapError::LengthsInvalid);
        }
        let user = self.users.entry(signer).or_default();
        if bid {
            user.bid_nonce += 1;
        }
        if ask {
            user.ask_nonce += 1;
        }
        tracing::info!(
            %signer,
            bid_nonce = user.bid_nonce,
            ask_nonce = user.ask_nonce,
            "global nonces incremented"
        );
        Ok((user.bid_nonce, user.ask_nonce))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openswap_types::MakerOrder;

    fn signer() -> Address {
        Address::repeat_byte(0xaa)
    }

    fn ask() -> MakerOrder {
        MakerOrder::dummy_ask(signer(), 1_000)
    }

    fn hash() -> B256 {
        B256::repeat_byte(1)
    }

    #[test]
    fn fresh_order_validates_with_zero_filled() {
        let ledger = NonceLedger::new();
        assert_eq!(ledger.validate_order(&ask(), hash()).unwrap(), 0);
    }

    #[test]
    fn executed_nonce_rejected() {
        let mut ledger = NonceLedger::new();
        ledger.record_fill(signer(), 0, hash(), 0, true);
        let err = ledger.validate_order(&ask(), hash()).unwrap_err();
        assert!(matches!(err, OpenswapError::WrongNonces));
    }

    #[test]
    fn partial_fill_accumulates_then_terminates() {
        let mut ledger = NonceLedger::new();
        ledger.record_fill(signer(), 0, hash(), 3, false);
        assert_eq!(ledger.validate_order(&ask(), hash()).unwrap(), 3);

        ledger.record_fill(signer(), 0, hash(), 10, true);
        assert!(ledger.validate_order(&ask(), hash()).is_err());
    }

    #[test]
    fn partial_fill_wrong_hash_rejected() {
        let mut ledger = NonceLedger::new();
        ledger.record_fill(signer(), 0, hash(), 3, false);
        let err = ledger
            .validate_order(&ask(), B256::repeat_byte(9))
            .unwrap_err();
        assert!(matches!(err, OpenswapError::WrongNonces));
    }

    #[test]
    fn global_increment_invalidates_one_side_only() {
        let mut ledger = NonceLedger::new();
        ledger.increment_nonces(signer(), false, true).unwrap();

        // Stale ask rejected.
        let err = ledger.validate_order(&ask(), hash()).unwrap_err();
        assert!(matches!(err, OpenswapError::WrongNonces));

        // Bids unaffected.
        let bid = MakerOrder::dummy_bid(signer(), Address::repeat_byte(0x20), 1_000);
        assert!(ledger.validate_order(&bid, hash()).is_ok());

        // A fresh ask signed against the new counter is live again.
        let mut fresh = ask();
        fresh.global_nonce = 1;
        assert!(ledger.validate_order(&fresh, hash()).is_ok());
    }

    #[test]
    fn subset_cancel_invalidates_all_carriers() {
        let mut ledger = NonceLedger::new();
        ledger.cancel_subset_nonces(signer(), &[7]).unwrap();

        let mut order = ask();
        order.subset_nonce = 7;
        order.order_nonce = 123;
        let err = ledger.validate_order(&order, hash()).unwrap_err();
        assert!(matches!(err, OpenswapError::WrongNonces));

        order.order_nonce = 456;
        assert!(ledger.validate_order(&order, hash()).is_err());
    }

    #[test]
    fn cancel_is_idempotent_and_sticky() {
        let mut ledger = NonceLedger::new();
        ledger.cancel_order_nonces(signer(), &[0]).unwrap();
        ledger.cancel_order_nonces(signer(), &[0]).unwrap();
        assert_eq!(
            ledger.user(signer()).order_status(0),
            OrderNonceStatus::Cancelled
        );

        // Executed stays executed even if later "cancelled".
        ledger.record_fill(signer(), 1, hash(), 0, true);
        ledger.cancel_order_nonces(signer(), &[1]).unwrap();
        assert_eq!(
            ledger.user(signer()).order_status(1),
            OrderNonceStatus::FullyExecuted
        );
    }

    #[test]
    fn empty_cancel_lists_rejected() {
        let mut ledger = NonceLedger::new();
        assert!(ledger.cancel_order_nonces(signer(), &[]).is_err());
        assert!(ledger.cancel_subset_nonces(signer(), &[]).is_err());
        assert!(ledger.increment_nonces(signer(), false, false).is_err());
    }

    #[test]
    fn restore_unused_removes_entry() {
        let mut ledger = NonceLedger::new();
        ledger.record_fill(signer(), 0, hash(), 0, true);
        ledger.restore_status(signer(), 0, OrderNonceStatus::Unused);
        assert_eq!(
            ledger.user(signer()).order_status(0),
            OrderNonceStatus::Unused
        );
    }
}
