//! Order types for the OpenSwap settlement engine.
//!
//! A [`MakerOrder`] is a signed, reusable trade intent. A [`TakerOrder`] is
//! the counter-intent supplied at settlement time. The engine never trusts
//! either: maker orders are authenticated against their signature and the
//! nonce ledger, taker orders only name the recipient and strategy inputs.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// Which side of the trade the maker signed.
///
/// A `Bid` maker offers currency for assets (filled by a taker ask); an
/// `Ask` maker offers assets for currency (filled by a taker bid).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum QuoteType {
    Bid,
    Ask,
}

impl std::fmt::Display for QuoteType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bid => write!(f, "BID"),
            Self::Ask => write!(f, "ASK"),
        }
    }
}

/// Token-standard family of the traded asset. Selects the transfer adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum AssetType {
    /// Non-fungible: every item id is unique, amounts are always 1.
    Erc721,
    /// Semi-fungible: item ids carry arbitrary positive amounts.
    Erc1155,
}

impl std::fmt::Display for AssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Erc721 => write!(f, "ERC721"),
            Self::Erc1155 => write!(f, "ERC1155"),
        }
    }
}

/// A signed, reusable trade intent.
///
/// The three nonce fields implement three granularities of replay
/// protection: `global_nonce` is compared against the signer's per-side
/// counter, `subset_nonce` against the signer's cancelled-subset set, and
/// `order_nonce` against the per-order status map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MakerOrder {
    pub quote_type: QuoteType,
    /// The signer's global counter for this side at signing time.
    pub global_nonce: u64,
    /// Groups orders so a whole subset can be cancelled in one operation.
    pub subset_nonce: u64,
    /// Per-order replay slot; shared by orders meant to be mutually
    /// exclusive (sign ten, fill at most one).
    pub order_nonce: u64,
    /// Execution strategy selected for this order.
    pub strategy_id: u32,
    pub asset_type: AssetType,
    /// Collection the item ids belong to.
    pub collection: Address,
    /// Settlement currency; the zero address denotes the native currency.
    pub currency: Address,
    /// The maker who signed this order.
    pub signer: Address,
    /// Validity window start (unix seconds, inclusive).
    pub start_time: i64,
    /// Validity window end (unix seconds, inclusive).
    pub end_time: i64,
    /// Price in base currency units. Per-unit for multi-fill strategies.
    pub price: u128,
    pub item_ids: Vec<u128>,
    /// Parallel to `item_ids`.
    pub amounts: Vec<u128>,
    /// Opaque strategy-specific parameters, decoded by the strategy.
    #[serde(with = "bytes_hex")]
    pub additional_parameters: Vec<u8>,
}

impl MakerOrder {
    /// Whether the native currency settles this order.
    #[must_use]
    pub fn is_native_currency(&self) -> bool {
        self.currency == Address::ZERO
    }

    /// Item-id and amount lists are parallel and non-empty.
    ///
    /// Strategies that permit collection-wide offers (no item ids) skip
    /// this check and validate their own shape instead.
    #[must_use]
    pub fn has_valid_item_lists(&self) -> bool {
        !self.item_ids.is_empty() && self.item_ids.len() == self.amounts.len()
    }

    /// Whether `now` falls inside the order's validity window.
    #[must_use]
    pub fn is_within_time_range(&self, now: i64) -> bool {
        self.start_time <= now && now <= self.end_time
    }
}

/// The counter-intent supplied at settlement time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TakerOrder {
    /// Who receives the purchased asset (taker bid) or the payment
    /// (taker ask).
    pub recipient: Address,
    /// Opaque strategy-specific parameters (items/amounts for strategies
    /// that let the taker choose, a price bound otherwise).
    #[serde(with = "bytes_hex")]
    pub additional_parameters: Vec<u8>,
}

impl TakerOrder {
    /// A taker order with no strategy parameters: accept the maker's terms.
    #[must_use]
    pub fn new(recipient: Address) -> Self {
        Self {
            recipient,
            additional_parameters: Vec::new(),
        }
    }
}

/// Hex serde for opaque parameter payloads.
mod bytes_hex {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        let s = s.strip_prefix("0x").unwrap_or(&s);
        hex::decode(s).map_err(serde::de::Error::custom)
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl MakerOrder {
    /// A single-item fixed-price ask: sell item 1 for `price`.
    pub fn dummy_ask(signer: Address, price: u128) -> Self {
        Self {
            quote_type: QuoteType::Ask,
            global_nonce: 0,
            subset_nonce: 0,
            order_nonce: 0,
            strategy_id: 0,
            asset_type: AssetType::Erc721,
            collection: Address::repeat_byte(0xcc),
            currency: Address::ZERO,
            signer,
            start_time: 0,
            end_time: i64::MAX,
            price,
            item_ids: vec![1],
            amounts: vec![1],
            additional_parameters: Vec::new(),
        }
    }

    /// A single-item fixed-price bid: buy item 1 for `price` in `currency`.
    pub fn dummy_bid(signer: Address, currency: Address, price: u128) -> Self {
        Self {
            quote_type: QuoteType::Bid,
            currency,
            ..Self::dummy_ask(signer, price)
        }
    }
}
