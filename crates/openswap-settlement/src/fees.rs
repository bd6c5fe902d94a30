//! Fee distribution — splits a settled price into seller proceeds,
//! protocol fee, creator royalty, and affiliate rebate.
//!
//! All arithmetic is integer basis points over `u128` prices, rounded
//! down at each division. The affiliate rebate is carved out of the
//! protocol fee after the minimum-total floor is applied, so the split
//! always sums back to the settled price exactly.

use alloy_primitives::{Address, U256};
use openswap_types::{
    FeeSplit, OpenswapError, Result, StrategyRecord, constants::ONE_HUNDRED_PERCENT_BP,
};

use crate::adapters::CreatorFeeOracle;

/// `amount * bp / 10_000` with a 256-bit intermediate product so maximal
/// `u128` prices cannot overflow. Callers keep `bp` at or below
/// `ONE_HUNDRED_PERCENT_BP`, so the quotient always fits back in `u128`.
fn bp_of(amount: u128, bp: u16) -> u128 {
    (U256::from(amount) * U256::from(bp) / U256::from(ONE_HUNDRED_PERCENT_BP)).to::<u128>()
}

/// Resolve the creator royalty for a (possibly bundled) order.
///
/// Every item in the bundle must resolve to the same recipient and rate;
/// a bundle mixing royalty configurations cannot be split faithfully and
/// is rejected outright.
///
/// # Errors
/// [`OpenswapError::BundleRoyaltyMismatch`] on disagreeing items;
/// [`OpenswapError::CreatorFeeTooHigh`] when the resolved rate exceeds
/// the engine's cap.
pub fn resolve_creator_fee(
    oracle: &dyn CreatorFeeOracle,
    collection: Address,
    item_ids: &[u128],
    max_creator_fee_bp: u16,
) -> Result<Option<(Address, u16)>> {
    let mut resolved: Option<Option<(Address, u16)>> = None;
    for &item_id in item_ids {
        let info = oracle.creator_fee_info(collection, item_id);
        match resolved {
            None => resolved = Some(info),
            Some(prior) if prior != info => return Err(OpenswapError::BundleRoyaltyMismatch),
            Some(_) => {}
        }
    }
    let info = resolved.flatten();
    if let Some((_, bp)) = info {
        if bp > max_creator_fee_bp {
            return Err(OpenswapError::CreatorFeeTooHigh { bp });
        }
        // A cap above 100% still never admits a rate above 100%.
        if bp > ONE_HUNDRED_PERCENT_BP {
            return Err(OpenswapError::PercentageTooHigh(bp));
        }
    }
    Ok(info)
}

/// Split `price` according to the strategy's fee schedule.
///
/// The protocol fee starts at the strategy's standard rate, is topped up
/// to the minimum-total floor when protocol plus creator falls short of
/// it, and then yields the affiliate rebate from within itself. The
/// seller receives everything that remains.
///
/// # Errors
/// Creator-fee resolution errors,
/// [`OpenswapError::PercentageTooHigh`] for any rate above 100%, or
/// [`OpenswapError::StrategyFeesInvalid`] when the schedule consumes more
/// than the settled price.
pub fn compute_fee_split(
    price: u128,
    collection: Address,
    item_ids: &[u128],
    strategy: &StrategyRecord,
    max_creator_fee_bp: u16,
    affiliate: Option<(Address, u16)>,
    oracle: &dyn CreatorFeeOracle,
) -> Result<FeeSplit> {
    for bp in [strategy.standard_protocol_fee_bp, strategy.min_total_fee_bp] {
        if bp > ONE_HUNDRED_PERCENT_BP {
            return Err(OpenswapError::PercentageTooHigh(bp));
        }
    }
    let creator = resolve_creator_fee(oracle, collection, item_ids, max_creator_fee_bp)?;
    let creator_amount = creator.map_or(0, |(_, bp)| bp_of(price, bp));

    let mut protocol = bp_of(price, strategy.standard_protocol_fee_bp);
    let floor = bp_of(price, strategy.min_total_fee_bp);
    // Each component is at most `price`, so the sum can wrap; a wrapped
    // sum is necessarily at or above the floor.
    if protocol.checked_add(creator_amount).is_some_and(|c| c < floor) {
        protocol = floor - creator_amount;
    }

    // Seller proceeds are fixed before the affiliate carve-out; the
    // rebate comes out of the protocol's share, not the seller's.
    let seller_proceeds = price
        .checked_sub(protocol)
        .and_then(|rest| rest.checked_sub(creator_amount))
        .ok_or(OpenswapError::StrategyFeesInvalid)?;

    let affiliate_fee = match affiliate {
        Some((_, rate)) if rate > ONE_HUNDRED_PERCENT_BP => {
            return Err(OpenswapError::PercentageTooHigh(rate));
        }
        Some((recipient, rate)) => {
            let amount = bp_of(protocol, rate);
            protocol -= amount;
            (amount > 0).then_some((recipient, amount))
        }
        None => None,
    };

    Ok(FeeSplit {
        protocol_fee: protocol,
        creator_fee: creator.and_then(|(recipient, _)| {
            (creator_amount > 0).then_some((recipient, creator_amount))
        }),
        affiliate_fee,
        seller_proceeds,
    })
}
