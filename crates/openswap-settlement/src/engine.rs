//! Settlement engine — the only mutator of nonce, strategy, and domain
//! state.
//!
//! Every public entry point follows the same shape: claim the reentrancy
//! guard, settle under a journal of completed effects, unwind the journal
//! on failure, release the guard. Batch entry points run either
//! atomically (one failure unwinds the whole batch) or best-effort (a
//! failing sub-order is unwound and skipped while the rest settle).
//!
//! ```text
//!   enter guard ──▶ validate ──▶ strategy ──▶ fees ──▶ transfers ──▶ nonce
//!        │                                                  │
//!        │                     failure: unwind journal ◀────┘
//!        └──▶ exit guard (always)
//! ```

use std::collections::HashMap;

use alloy_primitives::{Address, B256};
use chrono::Utc;
use openswap_types::{
    AssetType, MakerOrder, OpenswapError, OrderNonceStatus, QuoteType, Result, StrategyRecord,
    TakerOrder, TradeEvent, UserNonces, constants,
};

use openswap_auth::{
    DomainBinder, MerkleProofData, hash_batch_order, maker_order_hash, verify_contract_signature,
    verify_key_signature, verify_proof,
};
use openswap_strategies::{StrategyRegistry, execute_strategy, registry::standard_record};

use crate::adapters::Collaborators;
use crate::fees::compute_fee_split;
use crate::guard::ReentrancyGuard;
use crate::nonces::NonceLedger;

/// Construction-time engine parameters.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Administrative owner; the only caller admitted to admin operations.
    pub owner: Address,
    /// Recipient of the net protocol fee.
    pub protocol_fee_recipient: Address,
    /// Chain the signing domain is bound to at construction.
    pub chain_id: u64,
    /// The engine's own address, mixed into the signing domain.
    pub contract: Address,
    /// Standard protocol fee of the built-in strategy (basis points).
    pub standard_protocol_fee_bp: u16,
    /// Minimum-total fee floor of the built-in strategy (basis points).
    pub standard_min_total_fee_bp: u16,
    /// Ceiling for creator royalties accepted by the engine (basis points).
    pub max_creator_fee_bp: u16,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            owner: Address::ZERO,
            protocol_fee_recipient: Address::ZERO,
            chain_id: 1,
            contract: Address::ZERO,
            standard_protocol_fee_bp: 150,
            standard_min_total_fee_bp: 200,
            max_creator_fee_bp: constants::DEFAULT_MAX_CREATOR_FEE_BP,
        }
    }
}

/// One (maker, taker) pair submitted for settlement.
#[derive(Debug, Clone)]
pub struct OrderExecution {
    pub taker: TakerOrder,
    pub maker: MakerOrder,
    /// Maker signature over the order digest (or the batch root digest
    /// when `merkle` is present).
    pub signature: Vec<u8>,
    /// Inclusion proof when the maker signed a batch commitment instead
    /// of this single order.
    pub merkle: Option<MerkleProofData>,
    /// Affiliate to credit with a protocol-fee rebate, if enrolled.
    pub affiliate: Option<Address>,
}

/// Result of a best-effort (or atomic) batch settlement.
#[derive(Debug)]
pub struct BatchOutcome {
    /// Events of the sub-orders that settled, in submission order.
    pub events: Vec<TradeEvent>,
    /// Index and rejection cause of every skipped sub-order.
    pub skipped: Vec<(usize, OpenswapError)>,
    /// Payment value that was never pulled from the taker because the
    /// corresponding sub-orders were skipped, valued at each maker's
    /// stated price. For strategies that settle above that price (dutch
    /// auctions) this is a lower bound on the value left with the taker.
    pub refunded_to_taker: u128,
}

/// A completed effect that can be reversed during unwind.
#[derive(Debug)]
enum JournalEntry {
    Currency {
        currency: Address,
        from: Address,
        to: Address,
        amount: u128,
    },
    Asset {
        asset_type: AssetType,
        collection: Address,
        from: Address,
        to: Address,
        item_ids: Vec<u128>,
        amounts: Vec<u128>,
    },
    Nonce {
        signer: Address,
        order_nonce: u64,
        prior: OrderNonceStatus,
    },
}

/// The settlement engine.
pub struct SettlementEngine {
    owner: Address,
    protocol_fee_recipient: Address,
    max_creator_fee_bp: u16,
    /// Live chain id, compared against the bound domain on every
    /// settlement.
    chain_id: u64,
    pub(crate) domain: DomainBinder,
    pub(crate) nonces: NonceLedger,
    pub(crate) strategies: StrategyRegistry,
    guard: ReentrancyGuard,
    affiliate_active: bool,
    affiliate_rates: HashMap<Address, u16>,
}

impl SettlementEngine {
    /// Build an engine with the standard strategy registered under id 0.
    ///
    /// # Errors
    /// [`OpenswapError::StrategyFeesInvalid`] when the standard strategy's
    /// fees violate the global ceiling.
    pub fn new(config: EngineConfig) -> Result<Self> {
        let mut strategies = StrategyRegistry::new();
        strategies.add(standard_record(
            config.standard_protocol_fee_bp,
            config.standard_min_total_fee_bp,
            constants::MAX_PROTOCOL_FEE_BP,
        ))?;
        Ok(Self {
            owner: config.owner,
            protocol_fee_recipient: config.protocol_fee_recipient,
            max_creator_fee_bp: config.max_creator_fee_bp,
            chain_id: config.chain_id,
            domain: DomainBinder::new(
                constants::PROTOCOL_NAME,
                constants::PROTOCOL_VERSION,
                config.chain_id,
                config.contract,
            ),
            nonces: NonceLedger::new(),
            strategies,
            guard: ReentrancyGuard::new(),
            affiliate_active: false,
            affiliate_rates: HashMap::new(),
        })
    }

    // --- Views ---

    /// The active signing-domain separator.
    #[must_use]
    pub fn domain_separator(&self) -> B256 {
        self.domain.separator()
    }

    /// Replay-protection state of one signer.
    #[must_use]
    pub fn user_nonces(&self, signer: Address) -> UserNonces {
        self.nonces.user(signer)
    }

    /// Registered strategy record, without availability filtering.
    #[must_use]
    pub fn strategy(&self, id: u32) -> Option<&StrategyRecord> {
        self.strategies.get(id)
    }

    /// Maximum creator-fee rate the engine accepts (basis points).
    #[must_use]
    pub fn max_creator_fee_bp(&self) -> u16 {
        self.max_creator_fee_bp
    }

    pub(crate) fn affiliate_rate(&self, affiliate: Option<Address>) -> Option<(Address, u16)> {
        if !self.affiliate_active {
            return None;
        }
        let affiliate = affiliate?;
        let rate = self.affiliate_rates.get(&affiliate).copied().unwrap_or(0);
        (rate > 0).then_some((affiliate, rate))
    }

    // --- Settlement entry points ---

    /// Settle one taker bid against a signed maker ask.
    ///
    /// # Errors
    /// Any validation, authentication, strategy, fee, or transfer failure;
    /// all completed effects are unwound before returning.
    pub fn execute_taker_bid(
        &mut self,
        execution: &OrderExecution,
        collab: &mut Collaborators<'_>,
    ) -> Result<TradeEvent> {
        self.execute_single(execution, QuoteType::Ask, collab)
    }

    /// Settle one taker ask against a signed maker bid.
    ///
    /// # Errors
    /// As [`SettlementEngine::execute_taker_bid`].
    pub fn execute_taker_ask(
        &mut self,
        execution: &OrderExecution,
        collab: &mut Collaborators<'_>,
    ) -> Result<TradeEvent> {
        self.execute_single(execution, QuoteType::Bid, collab)
    }

    /// Settle a batch of taker bids against signed maker asks.
    ///
    /// With `atomic` set, the first failure unwinds the entire batch and
    /// is returned as the error. Otherwise failing sub-orders are unwound
    /// individually and reported in the outcome.
    ///
    /// # Errors
    /// [`OpenswapError::LengthsInvalid`] for an empty batch,
    /// [`OpenswapError::NoOrdersExecuted`] when a best-effort batch
    /// settles nothing, or the first failure of an atomic batch.
    pub fn execute_multiple_taker_bids(
        &mut self,
        executions: &[OrderExecution],
        atomic: bool,
        collab: &mut Collaborators<'_>,
    ) -> Result<BatchOutcome> {
        self.execute_batch(executions, QuoteType::Ask, atomic, collab)
    }

    /// Settle a batch of taker asks against signed maker bids.
    ///
    /// # Errors
    /// As [`SettlementEngine::execute_multiple_taker_bids`].
    pub fn execute_multiple_taker_asks(
        &mut self,
        executions: &[OrderExecution],
        atomic: bool,
        collab: &mut Collaborators<'_>,
    ) -> Result<BatchOutcome> {
        self.execute_batch(executions, QuoteType::Bid, atomic, collab)
    }

    fn execute_single(
        &mut self,
        execution: &OrderExecution,
        maker_side: QuoteType,
        collab: &mut Collaborators<'_>,
    ) -> Result<TradeEvent> {
        self.guard.enter()?;
        let mut journal = Vec::new();
        let result = self.settle_one(execution, maker_side, collab, &mut journal);
        if result.is_err() {
            self.unwind(journal, collab);
        }
        self.guard.exit();
        result
    }

    fn execute_batch(
        &mut self,
        executions: &[OrderExecution],
        maker_side: QuoteType,
        atomic: bool,
        collab: &mut Collaborators<'_>,
    ) -> Result<BatchOutcome> {
        if executions.is_empty() {
            return Err(OpenswapError::LengthsInvalid);
        }
        self.guard.enter()?;
        let result = if atomic {
            self.settle_batch_atomic(executions, maker_side, collab)
        } else {
            self.settle_batch_best_effort(executions, maker_side, collab)
        };
        self.guard.exit();
        result
    }

    fn settle_batch_atomic(
        &mut self,
        executions: &[OrderExecution],
        maker_side: QuoteType,
        collab: &mut Collaborators<'_>,
    ) -> Result<BatchOutcome> {
        let mut journal = Vec::new();
        let mut events = Vec::with_capacity(executions.len());
        for execution in executions {
            match self.settle_one(execution, maker_side, collab, &mut journal) {
                Ok(event) => events.push(event),
                Err(err) => {
                    self.unwind(journal, collab);
                    return Err(err);
                }
            }
        }
        Ok(BatchOutcome {
            events,
            skipped: Vec::new(),
            refunded_to_taker: 0,
        })
    }

    fn settle_batch_best_effort(
        &mut self,
        executions: &[OrderExecution],
        maker_side: QuoteType,
        collab: &mut Collaborators<'_>,
    ) -> Result<BatchOutcome> {
        // Best-effort batches settle against one currency so the skipped
        // value reported back to the taker is meaningful.
        let currency = executions[0].maker.currency;
        if let Some(bad) = executions.iter().find(|e| e.maker.currency != currency) {
            return Err(OpenswapError::CurrencyInvalid(bad.maker.currency));
        }

        let mut events = Vec::new();
        let mut skipped = Vec::new();
        let mut refunded_to_taker = 0u128;
        for (index, execution) in executions.iter().enumerate() {
            let mut journal = Vec::new();
            match self.settle_one(execution, maker_side, collab, &mut journal) {
                Ok(event) => events.push(event),
                Err(err) => {
                    self.unwind(journal, collab);
                    tracing::warn!(index, error = %err, "sub-order skipped");
                    if maker_side == QuoteType::Ask {
                        refunded_to_taker += execution.maker.price;
                    }
                    skipped.push((index, err));
                }
            }
        }
        if events.is_empty() {
            return Err(OpenswapError::NoOrdersExecuted);
        }
        Ok(BatchOutcome {
            events,
            skipped,
            refunded_to_taker,
        })
    }

    /// Validate, authenticate, price, and settle one (maker, taker) pair,
    /// appending every completed effect to `journal`.
    fn settle_one(
        &mut self,
        execution: &OrderExecution,
        maker_side: QuoteType,
        collab: &mut Collaborators<'_>,
        journal: &mut Vec<JournalEntry>,
    ) -> Result<TradeEvent> {
        let maker = &execution.maker;
        let taker = &execution.taker;

        if maker.quote_type != maker_side {
            return Err(OpenswapError::QuoteTypeInvalid);
        }
        if !collab.currencies.is_allowed(maker.currency) {
            return Err(OpenswapError::CurrencyInvalid(maker.currency));
        }
        // A maker bid escrows payment; the native currency cannot be
        // pulled from a signature alone.
        if maker.quote_type == QuoteType::Bid && maker.is_native_currency() {
            return Err(OpenswapError::CurrencyInvalid(maker.currency));
        }

        let order_hash = maker_order_hash(maker);
        let already_filled = self.nonces.validate_order(maker, order_hash)?;

        let now = Utc::now().timestamp();
        if !maker.is_within_time_range(now) {
            return Err(OpenswapError::OutsideOfTimeRange {
                start: maker.start_time,
                end: maker.end_time,
                now,
            });
        }

        self.verify_signature(order_hash, execution, collab)?;
        self.domain.assert_fresh(self.chain_id)?;

        let record = self
            .strategies
            .get_active(maker.strategy_id, maker.quote_type)?
            .clone();
        let output = execute_strategy(&record, maker, taker, already_filled, now)?;

        let affiliate = self.affiliate_rate(execution.affiliate);
        let fees = compute_fee_split(
            output.price,
            maker.collection,
            &output.item_ids,
            &record,
            self.max_creator_fee_bp,
            affiliate,
            collab.creator_fees,
        )?;

        let (buyer, seller) = match maker.quote_type {
            QuoteType::Ask => (taker.recipient, maker.signer),
            QuoteType::Bid => (maker.signer, taker.recipient),
        };

        pay(collab, journal, maker.currency, buyer, seller, fees.seller_proceeds)?;
        pay(
            collab,
            journal,
            maker.currency,
            buyer,
            self.protocol_fee_recipient,
            fees.protocol_fee,
        )?;
        if let Some((recipient, amount)) = fees.creator_fee {
            pay(collab, journal, maker.currency, buyer, recipient, amount)?;
        }
        if let Some((recipient, amount)) = fees.affiliate_fee {
            pay(collab, journal, maker.currency, buyer, recipient, amount)?;
        }
        move_assets(
            collab,
            journal,
            maker.asset_type,
            maker.collection,
            seller,
            buyer,
            &output.item_ids,
            &output.amounts,
        )?;

        let prior = self.nonces.user(maker.signer).order_status(maker.order_nonce);
        self.nonces.record_fill(
            maker.signer,
            maker.order_nonce,
            order_hash,
            already_filled + output.units_filled,
            output.nonce_fully_consumed,
        );
        journal.push(JournalEntry::Nonce {
            signer: maker.signer,
            order_nonce: maker.order_nonce,
            prior,
        });

        tracing::info!(
            %order_hash,
            maker = %maker.signer,
            taker = %taker.recipient,
            strategy_id = maker.strategy_id,
            price = output.price,
            "order settled"
        );

        Ok(TradeEvent {
            order_hash,
            order_nonce: maker.order_nonce,
            nonce_fully_consumed: output.nonce_fully_consumed,
            taker: taker.recipient,
            maker: maker.signer,
            strategy_id: maker.strategy_id,
            currency: maker.currency,
            collection: maker.collection,
            item_ids: output.item_ids,
            amounts: output.amounts,
            price: output.price,
            fees,
            executed_at: Utc::now(),
        })
    }

    /// Authenticate the maker signature, through the batch commitment when
    /// a proof is supplied.
    fn verify_signature(
        &self,
        order_hash: B256,
        execution: &OrderExecution,
        collab: &Collaborators<'_>,
    ) -> Result<()> {
        let struct_hash = match &execution.merkle {
            Some(merkle) => {
                if !verify_proof(order_hash, &merkle.proof, merkle.root) {
                    return Err(OpenswapError::MerkleProofInvalid);
                }
                hash_batch_order(merkle.root, merkle.proof.len())?
            }
            None => order_hash,
        };
        let digest = self.domain.digest(struct_hash);

        let signer = execution.maker.signer;
        if collab.signers.is_contract(signer) {
            verify_contract_signature(collab.signers, digest, &execution.signature, signer)
        } else {
            verify_key_signature(digest, &execution.signature, signer)
        }
    }

    /// Reverse completed effects, newest first.
    ///
    /// Reversal runs on the error path; a collaborator refusing to take
    /// back what it just accepted is logged rather than propagated so the
    /// original failure survives.
    fn unwind(&mut self, journal: Vec<JournalEntry>, collab: &mut Collaborators<'_>) {
        for entry in journal.into_iter().rev() {
            match entry {
                JournalEntry::Currency {
                    currency,
                    from,
                    to,
                    amount,
                } => {
                    if let Err(err) = collab.ledger.transfer(currency, to, from, amount) {
                        tracing::error!(error = %err, "currency unwind failed");
                    }
                }
                JournalEntry::Asset {
                    asset_type,
                    collection,
                    from,
                    to,
                    item_ids,
                    amounts,
                } => {
                    if let Err(err) = collab.assets.transfer(
                        asset_type, collection, to, from, &item_ids, &amounts,
                    ) {
                        tracing::error!(error = %err, "asset unwind failed");
                    }
                }
                JournalEntry::Nonce {
                    signer,
                    order_nonce,
                    prior,
                } => self.nonces.restore_status(signer, order_nonce, prior),
            }
        }
    }

    // --- Nonce operations (caller is the signer) ---

    /// Cancel specific order nonces for `signer`.
    ///
    /// # Errors
    /// [`OpenswapError::LengthsInvalid`] for an empty list.
    pub fn cancel_order_nonces(&mut self, signer: Address, nonces: &[u64]) -> Result<()> {
        self.nonces.cancel_order_nonces(signer, nonces)
    }

    /// Cancel subset nonces for `signer`.
    ///
    /// # Errors
    /// [`OpenswapError::LengthsInvalid`] for an empty list.
    pub fn cancel_subset_nonces(&mut self, signer: Address, nonces: &[u64]) -> Result<()> {
        self.nonces.cancel_subset_nonces(signer, nonces)
    }

    /// Bump `signer`'s global bid and/or ask nonce.
    ///
    /// # Errors
    /// [`OpenswapError::LengthsInvalid`] when neither side is selected.
    pub fn increment_nonces(
        &mut self,
        signer: Address,
        bid: bool,
        ask: bool,
    ) -> Result<(u64, u64)> {
        self.nonces.increment_nonces(signer, bid, ask)
    }

    // --- Admin operations (owner only) ---

    fn require_owner(&self, caller: Address) -> Result<()> {
        if caller != self.owner {
            return Err(OpenswapError::CallerInvalid);
        }
        Ok(())
    }

    /// Register a new strategy.
    ///
    /// # Errors
    /// [`OpenswapError::CallerInvalid`], plus registry rejections for bad
    /// fee bounds or a taken id.
    pub fn add_strategy(&mut self, caller: Address, record: StrategyRecord) -> Result<()> {
        self.require_owner(caller)?;
        self.strategies.add(record)
    }

    /// Update an existing strategy's fees and active flag.
    ///
    /// # Errors
    /// [`OpenswapError::CallerInvalid`], plus registry rejections.
    pub fn update_strategy(
        &mut self,
        caller: Address,
        id: u32,
        active: bool,
        standard_protocol_fee_bp: u16,
        min_total_fee_bp: u16,
    ) -> Result<()> {
        self.require_owner(caller)?;
        self.strategies
            .update(id, active, standard_protocol_fee_bp, min_total_fee_bp)
    }

    /// Rebind the signing domain to the live chain id after a fork.
    ///
    /// # Errors
    /// [`OpenswapError::CallerInvalid`] or
    /// [`OpenswapError::SameDomainSeparator`] for a redundant update.
    pub fn update_domain_separator(&mut self, caller: Address) -> Result<B256> {
        self.require_owner(caller)?;
        self.domain.refresh(self.chain_id)
    }

    /// Record a change of the live chain id (fork detection input).
    ///
    /// Settlement fails from this point until the domain is rebound.
    ///
    /// # Errors
    /// [`OpenswapError::CallerInvalid`].
    pub fn set_chain_id(&mut self, caller: Address, chain_id: u64) -> Result<()> {
        self.require_owner(caller)?;
        tracing::info!(old = self.chain_id, new = chain_id, "live chain id changed");
        self.chain_id = chain_id;
        Ok(())
    }

    /// Enroll or update an affiliate's protocol-fee rebate rate.
    ///
    /// # Errors
    /// [`OpenswapError::CallerInvalid`] or
    /// [`OpenswapError::PercentageTooHigh`] above 100%.
    pub fn update_affiliate_rate(
        &mut self,
        caller: Address,
        affiliate: Address,
        rate_bp: u16,
    ) -> Result<()> {
        self.require_owner(caller)?;
        if rate_bp > constants::ONE_HUNDRED_PERCENT_BP {
            return Err(OpenswapError::PercentageTooHigh(rate_bp));
        }
        self.affiliate_rates.insert(affiliate, rate_bp);
        tracing::info!(%affiliate, rate_bp, "affiliate rate updated");
        Ok(())
    }

    /// Switch the affiliate program on or off.
    ///
    /// # Errors
    /// [`OpenswapError::CallerInvalid`].
    pub fn set_affiliate_program_active(&mut self, caller: Address, active: bool) -> Result<()> {
        self.require_owner(caller)?;
        self.affiliate_active = active;
        tracing::info!(active, "affiliate program toggled");
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn guard_mut(&mut self) -> &mut ReentrancyGuard {
        &mut self.guard
    }
}

fn pay(
    collab: &mut Collaborators<'_>,
    journal: &mut Vec<JournalEntry>,
    currency: Address,
    from: Address,
    to: Address,
    amount: u128,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }
    collab.ledger.transfer(currency, from, to, amount)?;
    journal.push(JournalEntry::Currency {
        currency,
        from,
        to,
        amount,
    });
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn move_assets(
    collab: &mut Collaborators<'_>,
    journal: &mut Vec<JournalEntry>,
    asset_type: AssetType,
    collection: Address,
    from: Address,
    to: Address,
    item_ids: &[u128],
    amounts: &[u128],
) -> Result<()> {
    collab
        .assets
        .transfer(asset_type, collection, from, to, item_ids, amounts)?;
    journal.push(JournalEntry::Asset {
        asset_type,
        collection,
        from,
        to,
        item_ids: item_ids.to_vec(),
        amounts: amounts.to_vec(),
    });
    Ok(())
}
