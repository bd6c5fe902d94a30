//! Linearly decaying (dutch) auction strategy (maker ask).
//!
//! The maker's opaque parameters carry the auction's start price; the
//! signed `price` field is the floor. The current price decays linearly
//! from start to floor over the order's validity window. The taker's bid
//! must meet the current price; the fill settles *at* the current price,
//! not at the taker's bound.

use alloy_primitives::U256;
use openswap_types::{MakerOrder, OpenswapError, Result, TakerOrder};
use serde::{Deserialize, Serialize};

use crate::{StrategyOutput, decode_params, validate_amounts};

/// Maker-side auction parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DutchAuctionMakerParams {
    /// Opening price; must be at least the maker's floor price.
    pub start_price: u128,
}

/// Taker-side auction parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DutchAuctionTakerParams {
    /// The most the taker is willing to pay.
    pub max_price: u128,
}

/// Execute one dutch-auction fill at the time-decayed price.
pub fn execute(maker: &MakerOrder, taker: &TakerOrder, now: i64) -> Result<StrategyOutput> {
    if !maker.has_valid_item_lists() {
        return Err(OpenswapError::OrderInvalid {
            reason: "empty or mismatched item/amount lists".to_string(),
        });
    }
    validate_amounts(maker.asset_type, &maker.amounts)?;

    let maker_params: DutchAuctionMakerParams = decode_params(&maker.additional_parameters)?;
    if maker_params.start_price < maker.price {
        return Err(OpenswapError::OrderInvalid {
            reason: "auction start price below floor price".to_string(),
        });
    }

    let current = current_price(
        maker_params.start_price,
        maker.price,
        maker.start_time,
        maker.end_time,
        now,
    );

    let taker_params: DutchAuctionTakerParams = decode_params(&taker.additional_parameters)?;
    if taker_params.max_price < current {
        return Err(OpenswapError::BidTooLow {
            bid: taker_params.max_price,
            current,
        });
    }

    Ok(StrategyOutput {
        price: current,
        item_ids: maker.item_ids.clone(),
        amounts: maker.amounts.clone(),
        units_filled: 0,
        nonce_fully_consumed: true,
    })
}

/// Linear interpolation from `start_price` at `start_time` down to
/// `floor_price` at `end_time`, clamped to the window.
fn current_price(
    start_price: u128,
    floor_price: u128,
    start_time: i64,
    end_time: i64,
    now: i64,
) -> u128 {
    if now <= start_time || end_time <= start_time {
        return start_price;
    }
    if now >= end_time {
        return floor_price;
    }
    let elapsed = (now - start_time) as u128;
    let window = (end_time - start_time) as u128;
    // 256-bit intermediate: the spread times the elapsed ticks can exceed
    // u128 for maximal prices. The discount never exceeds the spread, so
    // it fits back into u128.
    let discount = U256::from(start_price - floor_price) * U256::from(elapsed) / U256::from(window);
    start_price - discount.to::<u128>()
}
