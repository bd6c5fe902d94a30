//! Collection-wide offer strategy (maker bid, multi-fill).
//!
//! The maker bids a per-unit price for *any* item of a collection: the
//! signed order carries no item ids and a single amount naming the total
//! unit budget. Each taker ask picks a concrete item id and unit count.
//! Cumulative fills run through the engine's partial-fill accumulator; the
//! order nonce flips to fully executed when the last unit fills.

use openswap_types::{MakerOrder, OpenswapError, Result, TakerOrder};
use serde::{Deserialize, Serialize};

use crate::{StrategyOutput, decode_params, validate_amounts};

/// The taker's pick: which item fills the offer, and how many units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionOfferTakerParams {
    pub item_id: u128,
    pub amount: u128,
}

/// Execute one fill against a collection offer.
///
/// `already_filled` is the accumulator value for this order's nonce.
pub fn execute(
    maker: &MakerOrder,
    taker: &TakerOrder,
    already_filled: u128,
) -> Result<StrategyOutput> {
    // Collection offers are the one shape where zero item ids is legal:
    // the taker picks the item. The budget lives in amounts[0].
    if !maker.item_ids.is_empty() || maker.amounts.len() != 1 {
        return Err(OpenswapError::OrderInvalid {
            reason: "collection offer must have no item ids and a single unit budget".to_string(),
        });
    }
    let budget = maker.amounts[0];
    if budget == 0 {
        return Err(OpenswapError::OrderInvalid {
            reason: "collection offer unit budget is zero".to_string(),
        });
    }
    let params: CollectionOfferTakerParams = decode_params(&taker.additional_parameters)?;
    validate_amounts(maker.asset_type, &[params.amount])?;

    let remaining = budget - already_filled;
    if params.amount > remaining {
        return Err(OpenswapError::OrderInvalid {
            reason: format!(
                "fill of {} exceeds remaining budget {remaining}",
                params.amount
            ),
        });
    }

    let fill_value = maker.price.checked_mul(params.amount).ok_or_else(|| {
        OpenswapError::OrderInvalid {
            reason: format!(
                "fill value overflows: {} units at {} each",
                params.amount, maker.price
            ),
        }
    })?;

    Ok(StrategyOutput {
        price: fill_value,
        item_ids: vec![params.item_id],
        amounts: vec![params.amount],
        units_filled: params.amount,
        nonce_fully_consumed: already_filled + params.amount == budget,
    })
}
