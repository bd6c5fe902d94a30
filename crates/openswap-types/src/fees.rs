//! Fee split — how one settlement's proceeds are distributed.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// The three-way (plus affiliate carve-out) split of a settled price.
///
/// Invariant: `seller_proceeds + creator + net protocol + affiliate`
/// equals the settled price exactly, for every basis-point configuration
/// within bounds. [`FeeSplit::total`] exists so callers can assert it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSplit {
    /// Protocol fee after the affiliate cut was carved out.
    pub protocol_fee: u128,
    /// Creator/royalty payment, when the oracle resolved one.
    pub creator_fee: Option<(Address, u128)>,
    /// Affiliate rebate carved out of the protocol fee.
    pub affiliate_fee: Option<(Address, u128)>,
    /// What is left for the seller after all fees.
    pub seller_proceeds: u128,
}

impl FeeSplit {
    /// Sum of all components; equals the settled price by construction.
    #[must_use]
    pub fn total(&self) -> u128 {
        self.seller_proceeds
            + self.protocol_fee
            + self.creator_fee.map_or(0, |(_, amount)| amount)
            + self.affiliate_fee.map_or(0, |(_, amount)| amount)
    }
}
