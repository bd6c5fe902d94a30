//! Strategy registry — exclusive owner of strategy records.
//!
//! The registry validates the fee-bound invariant on every registration
//! and update; executing code resolves strategies through
//! [`StrategyRegistry::get_active`], which refuses unregistered, inactive,
//! and wrong-side strategies.

use std::collections::HashMap;

use openswap_types::{OpenswapError, QuoteType, Result, StrategyKind, StrategyRecord};

/// Owned, single-writer lookup table keyed by strategy id.
#[derive(Debug, Default)]
pub struct StrategyRegistry {
    strategies: HashMap<u32, StrategyRecord>,
}

impl StrategyRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new strategy.
    ///
    /// # Errors
    /// [`OpenswapError::StrategyFeesInvalid`] when the fee bounds violate
    /// `standard, minTotal <= maxProtocol <= global ceiling`;
    /// [`OpenswapError::StrategyNotAvailable`] when the id is taken.
    pub fn add(&mut self, record: StrategyRecord) -> Result<()> {
        record.validate_fee_bounds()?;
        if self.strategies.contains_key(&record.id) {
            return Err(OpenswapError::StrategyNotAvailable(record.id));
        }
        tracing::info!(
            strategy_id = record.id,
            kind = %record.kind,
            standard_bp = record.standard_protocol_fee_bp,
            max_bp = record.max_protocol_fee_bp,
            "strategy registered"
        );
        self.strategies.insert(record.id, record);
        Ok(())
    }

    /// Update an existing strategy's fees and active flag.
    ///
    /// The registered `max_protocol_fee_bp` is immutable; new fees must
    /// stay within it.
    ///
    /// # Errors
    /// [`OpenswapError::StrategyNotFound`] for an unknown id;
    /// [`OpenswapError::StrategyFeesInvalid`] when new fees exceed the
    /// registered ceiling.
    pub fn update(
        &mut self,
        id: u32,
        active: bool,
        standard_protocol_fee_bp: u16,
        min_total_fee_bp: u16,
    ) -> Result<()> {
        let record = self
            .strategies
            .get_mut(&id)
            .ok_or(OpenswapError::StrategyNotFound(id))?;
        if standard_protocol_fee_bp > record.max_protocol_fee_bp
            || min_total_fee_bp > record.max_protocol_fee_bp
        {
            return Err(OpenswapError::StrategyFeesInvalid);
        }
        record.active = active;
        record.standard_protocol_fee_bp = standard_protocol_fee_bp;
        record.min_total_fee_bp = min_total_fee_bp;
        tracing::info!(strategy_id = id, active, "strategy updated");
        Ok(())
    }

    /// Look up a record without availability checks (diagnostics).
    #[must_use]
    pub fn get(&self, id: u32) -> Option<&StrategyRecord> {
        self.strategies.get(&id)
    }

    /// Resolve a strategy for execution against a maker order on `side`.
    ///
    /// # Errors
    /// [`OpenswapError::StrategyNotAvailable`] when the strategy is
    /// unregistered, inactive, or restricted to the other maker side.
    pub fn get_active(&self, id: u32, side: QuoteType) -> Result<&StrategyRecord> {
        let record = self
            .strategies
            .get(&id)
            .ok_or(OpenswapError::StrategyNotAvailable(id))?;
        if !record.active || !record.accepts_maker_side(side) {
            return Err(OpenswapError::StrategyNotAvailable(id));
        }
        Ok(record)
    }

    /// Number of registered strategies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

/// The built-in standard strategy under id 0.
#[must_use]
pub fn standard_record(
    standard_protocol_fee_bp: u16,
    min_total_fee_bp: u16,
    max_protocol_fee_bp: u16,
) -> StrategyRecord {
    StrategyRecord {
        id: 0,
        active: true,
        standard_protocol_fee_bp,
        min_total_fee_bp,
        max_protocol_fee_bp,
        kind: StrategyKind::Standard,
        maker_side: None,
    }
}
