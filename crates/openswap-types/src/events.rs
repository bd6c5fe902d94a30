//! Settlement events.
//!
//! A [`TradeEvent`] carries everything an off-chain indexer needs to
//! reconstruct full trade economics without re-deriving fee math.

use alloy_primitives::{Address, B256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::FeeSplit;

/// Emitted once per successfully settled (maker, taker) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeEvent {
    /// Typed hash of the consumed maker order.
    pub order_hash: B256,
    /// The maker order's per-order nonce.
    pub order_nonce: u64,
    /// Whether this fill fully consumed the order nonce.
    pub nonce_fully_consumed: bool,
    /// Taker recipient address.
    pub taker: Address,
    /// Maker (signer) address.
    pub maker: Address,
    pub strategy_id: u32,
    pub currency: Address,
    pub collection: Address,
    /// Item ids resolved by the strategy for this fill.
    pub item_ids: Vec<u128>,
    /// Amounts resolved by the strategy, parallel to `item_ids`.
    pub amounts: Vec<u128>,
    /// Settled price for this fill.
    pub price: u128,
    /// Payment recipients and their respective amounts.
    pub fees: FeeSplit,
    pub executed_at: DateTime<Utc>,
}
