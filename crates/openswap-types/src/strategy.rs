//! Strategy registration records.
//!
//! Strategies are a closed set of tagged variants, not an open plugin
//! system: every accepted strategy is vetted against the same fee-bound
//! contract before registration.

use serde::{Deserialize, Serialize};

use crate::{OpenswapError, QuoteType, Result, constants};

/// Dispatch variant — which execution logic a registered strategy runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyKind {
    /// Fixed-price trade of the maker's exact item/amount lists.
    Standard,
    /// Collection-wide offer: the taker picks the item; supports
    /// cumulative partial fills up to the maker's unit budget.
    CollectionOffer,
    /// Ask whose price decays linearly over the validity window.
    DutchAuction,
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standard => write!(f, "STANDARD"),
            Self::CollectionOffer => write!(f, "COLLECTION_OFFER"),
            Self::DutchAuction => write!(f, "DUTCH_AUCTION"),
        }
    }
}

/// One registered strategy with its fee bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyRecord {
    pub id: u32,
    pub active: bool,
    /// Protocol fee charged under normal conditions (basis points).
    pub standard_protocol_fee_bp: u16,
    /// Floor for protocol fee + creator fee; the protocol fee is topped up
    /// to meet it (basis points).
    pub min_total_fee_bp: u16,
    /// Ceiling the protocol fee can never exceed for this strategy
    /// (basis points). Immutable after registration.
    pub max_protocol_fee_bp: u16,
    pub kind: StrategyKind,
    /// Maker side this strategy applies to; `None` serves both sides.
    pub maker_side: Option<QuoteType>,
}

impl StrategyRecord {
    /// Enforce `standard, minTotal <= maxProtocol <= global ceiling`.
    ///
    /// # Errors
    /// Returns [`OpenswapError::StrategyFeesInvalid`] on violation.
    pub fn validate_fee_bounds(&self) -> Result<()> {
        if self.standard_protocol_fee_bp > self.max_protocol_fee_bp
            || self.min_total_fee_bp > self.max_protocol_fee_bp
            || self.max_protocol_fee_bp > constants::MAX_PROTOCOL_FEE_BP
        {
            return Err(OpenswapError::StrategyFeesInvalid);
        }
        Ok(())
    }

    /// Whether this strategy accepts a maker order on `side`.
    #[must_use]
    pub fn accepts_maker_side(&self, side: QuoteType) -> bool {
        self.maker_side.is_none_or(|s| s == side)
    }
}
