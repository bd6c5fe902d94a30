//! # openswap-strategies
//!
//! Execution strategy dispatch for the OpenSwap settlement engine.
//!
//! Strategies are a **closed set of tagged variants** behind one dispatch
//! function — adding a strategy kind is a new variant plus a registry
//! entry, not an open-ended plugin system, because every accepted strategy
//! must be vetted against the same fee-bound contract.
//!
//! Strategy execution is pure: it receives the (maker, taker) pair plus
//! read-only fill context and returns a [`StrategyOutput`]; all state
//! mutation stays in the settlement engine.

pub mod collection;
pub mod dutch;
pub mod registry;
pub mod standard;

use openswap_types::{MakerOrder, OpenswapError, Result, StrategyKind, StrategyRecord, TakerOrder};
use serde::de::DeserializeOwned;

pub use registry::StrategyRegistry;

/// What a strategy resolved for one fill. Transient, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyOutput {
    /// Settled price for this fill.
    pub price: u128,
    /// Concrete item ids transferred by this fill.
    pub item_ids: Vec<u128>,
    /// Amounts transferred, parallel to `item_ids`.
    pub amounts: Vec<u128>,
    /// Units this fill consumed (drives the partial-fill accumulator).
    pub units_filled: u128,
    /// Whether the order nonce is fully consumed after this fill.
    pub nonce_fully_consumed: bool,
}

/// Dispatch one fill to the strategy variant named by `record`.
///
/// `already_filled` is the partial-fill accumulator value for this order
/// (always zero for single-fill strategies); `now` is the wall-clock in
/// unix seconds for time-dependent pricing.
///
/// # Errors
/// Strategy-specific: [`OpenswapError::OrderInvalid`] for shape/price
/// mismatches, [`OpenswapError::BidTooLow`] for under-priced auction bids.
pub fn execute_strategy(
    record: &StrategyRecord,
    maker: &MakerOrder,
    taker: &TakerOrder,
    already_filled: u128,
    now: i64,
) -> Result<StrategyOutput> {
    match record.kind {
        StrategyKind::Standard => standard::execute(maker, taker),
        StrategyKind::CollectionOffer => collection::execute(maker, taker, already_filled),
        StrategyKind::DutchAuction => dutch::execute(maker, taker, now),
    }
}

/// Decode a strategy's opaque parameter payload.
///
/// # Errors
/// An undecodable payload is an [`OpenswapError::OrderInvalid`].
pub(crate) fn decode_params<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|err| OpenswapError::OrderInvalid {
        reason: format!("undecodable strategy parameters: {err}"),
    })
}

/// Amounts must be positive, and exactly 1 for non-fungible items.
pub(crate) fn validate_amounts(
    asset_type: openswap_types::AssetType,
    amounts: &[u128],
) -> Result<()> {
    for &amount in amounts {
        let valid = match asset_type {
            openswap_types::AssetType::Erc721 => amount == 1,
            openswap_types::AssetType::Erc1155 => amount > 0,
        };
        if !valid {
            return Err(OpenswapError::OrderInvalid {
                reason: format!("invalid amount {amount} for {asset_type}"),
            });
        }
    }
    Ok(())
}
