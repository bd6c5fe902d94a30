//! Standard fixed-price strategy.
//!
//! Trades the maker's exact item/amount lists at the maker's signed price.
//! Taker parameters are optional: an empty payload accepts the maker's
//! terms; a present payload must match the maker's items, amounts, and
//! price exactly — any mismatch fails the fill.

use openswap_types::{MakerOrder, OpenswapError, Result, TakerOrder};
use serde::{Deserialize, Serialize};

use crate::{StrategyOutput, decode_params, validate_amounts};

/// The taker's restatement of the terms it believes it is accepting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardTakerParams {
    /// Price bound; must equal the maker's price.
    pub price: u128,
    pub item_ids: Vec<u128>,
    pub amounts: Vec<u128>,
}

/// Execute one standard fixed-price fill. Fully consumes the order nonce.
pub fn execute(maker: &MakerOrder, taker: &TakerOrder) -> Result<StrategyOutput> {
    if !maker.has_valid_item_lists() {
        return Err(OpenswapError::OrderInvalid {
            reason: "empty or mismatched item/amount lists".to_string(),
        });
    }
    validate_amounts(maker.asset_type, &maker.amounts)?;

    if !taker.additional_parameters.is_empty() {
        let params: StandardTakerParams = decode_params(&taker.additional_parameters)?;
        if params.price != maker.price {
            return Err(OpenswapError::OrderInvalid {
                reason: format!(
                    "taker price bound {} != maker price {}",
                    params.price, maker.price
                ),
            });
        }
        if params.item_ids != maker.item_ids || params.amounts != maker.amounts {
            return Err(OpenswapError::OrderInvalid {
                reason: "taker item/amount lists do not match maker".to_string(),
            });
        }
    }

    Ok(StrategyOutput {
        price: maker.price,
        item_ids: maker.item_ids.clone(),
        amounts: maker.amounts.clone(),
        units_filled: 0,
        nonce_fully_consumed: true,
    })
}
