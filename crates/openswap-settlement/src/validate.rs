//! Read-only order checker.
//!
//! Produces one diagnostic code per category for a maker order without
//! touching any state. Codes inform off-chain callers which category
//! would reject the order at settlement time; a zero in every slot means
//! the order is expected to settle.
//!
//! The checker deliberately re-derives its verdicts from the same
//! primitives the settlement path uses, so the two tiers cannot drift.

use chrono::Utc;
use openswap_types::{
    AssetType, MakerOrder, OpenswapError, OrderNonceStatus, QuoteType, StrategyKind,
    validation_codes as codes,
    validation_codes::{CRITERIA_GROUPS, group},
};

use openswap_auth::{
    hash_batch_order, maker_order_hash, verify_contract_signature, verify_key_signature,
    verify_proof,
};

use crate::adapters::{ContractSignerVerifier, CreatorFeeOracle, CurrencyAllowlist};
use crate::engine::{OrderExecution, SettlementEngine};
use crate::fees::resolve_creator_fee;

impl SettlementEngine {
    /// Diagnose one maker order against the engine's current state.
    ///
    /// Never mutates and never aborts: each of the [`CRITERIA_GROUPS`]
    /// slots carries either zero or the first failure code found for its
    /// category.
    #[must_use]
    pub fn check_order_validity(
        &self,
        execution: &OrderExecution,
        creator_fees: &dyn CreatorFeeOracle,
        currencies: &dyn CurrencyAllowlist,
        signers: &dyn ContractSignerVerifier,
    ) -> [u32; CRITERIA_GROUPS] {
        let maker = &execution.maker;
        let now = Utc::now().timestamp();
        let order_hash = maker_order_hash(maker);

        let mut result = [codes::ORDER_EXPECTED_TO_BE_VALID; CRITERIA_GROUPS];
        result[group::NONCE] = self.nonce_code(maker, order_hash);
        result[group::SIGNATURE] = self.signature_code(execution, order_hash, signers);
        result[group::TIMESTAMP] = timestamp_code(maker, now);
        result[group::ASSET_SHAPE] = self.shape_code(maker);
        result[group::CURRENCY] = currency_code(maker, currencies);
        result[group::FEES] = self.fee_code(maker, creator_fees);
        result[group::STRATEGY] = self.strategy_code(maker);
        result
    }

    /// Diagnose a list of maker orders in one call.
    #[must_use]
    pub fn check_multiple_order_validities(
        &self,
        executions: &[OrderExecution],
        creator_fees: &dyn CreatorFeeOracle,
        currencies: &dyn CurrencyAllowlist,
        signers: &dyn ContractSignerVerifier,
    ) -> Vec<[u32; CRITERIA_GROUPS]> {
        executions
            .iter()
            .map(|e| self.check_order_validity(e, creator_fees, currencies, signers))
            .collect()
    }

    fn nonce_code(&self, maker: &MakerOrder, order_hash: alloy_primitives::B256) -> u32 {
        let user = self.nonces.user(maker.signer);
        let expected = match maker.quote_type {
            QuoteType::Bid => user.bid_nonce,
            QuoteType::Ask => user.ask_nonce,
        };
        if maker.global_nonce != expected {
            return codes::GLOBAL_NONCE_INVALIDATED;
        }
        if user.cancelled_subsets.contains(&maker.subset_nonce) {
            return codes::SUBSET_NONCE_CANCELLED;
        }
        match user.order_status(maker.order_nonce) {
            OrderNonceStatus::Unused => codes::ORDER_EXPECTED_TO_BE_VALID,
            OrderNonceStatus::PartiallyFilled { order_hash: h, .. } if h == order_hash => {
                codes::ORDER_EXPECTED_TO_BE_VALID
            }
            OrderNonceStatus::PartiallyFilled { .. } => codes::ORDER_NONCE_PARTIAL_FILL_MISMATCH,
            _ => codes::ORDER_NONCE_EXECUTED_OR_CANCELLED,
        }
    }

    fn signature_code(
        &self,
        execution: &OrderExecution,
        order_hash: alloy_primitives::B256,
        signers: &dyn ContractSignerVerifier,
    ) -> u32 {
        let struct_hash = match &execution.merkle {
            Some(merkle) => {
                let batch_hash = match hash_batch_order(merkle.root, merkle.proof.len()) {
                    Ok(hash) => hash,
                    Err(_) => return codes::MERKLE_PROOF_TOO_LARGE,
                };
                if !verify_proof(order_hash, &merkle.proof, merkle.root) {
                    return codes::MERKLE_PROOF_INVALID;
                }
                batch_hash
            }
            None => order_hash,
        };
        let digest = self.domain.digest(struct_hash);

        let signer = execution.maker.signer;
        let verdict = if signers.is_contract(signer) {
            verify_contract_signature(signers, digest, &execution.signature, signer)
        } else {
            verify_key_signature(digest, &execution.signature, signer)
        };
        match verdict {
            Ok(()) => codes::ORDER_EXPECTED_TO_BE_VALID,
            Err(OpenswapError::InvalidSignatureLength(_)) => codes::SIGNATURE_LENGTH_INVALID,
            Err(OpenswapError::BadSignatureV(_)) => codes::SIGNATURE_V_INVALID,
            Err(OpenswapError::BadSignatureS) => codes::SIGNATURE_S_INVALID,
            Err(OpenswapError::ContractSignerRejected(_)) => codes::CONTRACT_SIGNER_REJECTION,
            Err(_) => codes::SIGNER_MISMATCH,
        }
    }

    fn shape_code(&self, maker: &MakerOrder) -> u32 {
        // Collection offers carry no item list by design; their single
        // amount is the unit budget.
        let collection_offer = self
            .strategies
            .get(maker.strategy_id)
            .is_some_and(|r| r.kind == StrategyKind::CollectionOffer);
        if collection_offer {
            if maker.item_ids.is_empty() && maker.amounts.len() == 1 && maker.amounts[0] > 0 {
                return codes::ORDER_EXPECTED_TO_BE_VALID;
            }
            return codes::AMOUNT_INVALID_FOR_ASSET_TYPE;
        }

        if maker.item_ids.is_empty() {
            return codes::ITEM_LIST_EMPTY;
        }
        if maker.item_ids.len() != maker.amounts.len() {
            return codes::ITEM_AMOUNT_LENGTH_MISMATCH;
        }
        let amounts_ok = maker.amounts.iter().all(|&a| match maker.asset_type {
            AssetType::Erc721 => a == 1,
            AssetType::Erc1155 => a > 0,
        });
        if amounts_ok {
            codes::ORDER_EXPECTED_TO_BE_VALID
        } else {
            codes::AMOUNT_INVALID_FOR_ASSET_TYPE
        }
    }

    fn fee_code(&self, maker: &MakerOrder, creator_fees: &dyn CreatorFeeOracle) -> u32 {
        match resolve_creator_fee(
            creator_fees,
            maker.collection,
            &maker.item_ids,
            self.max_creator_fee_bp(),
        ) {
            Ok(_) => codes::ORDER_EXPECTED_TO_BE_VALID,
            Err(OpenswapError::BundleRoyaltyMismatch) => codes::BUNDLE_ROYALTY_INCONSISTENT,
            Err(_) => codes::CREATOR_FEE_ABOVE_CAP,
        }
    }

    fn strategy_code(&self, maker: &MakerOrder) -> u32 {
        match self.strategies.get(maker.strategy_id) {
            None => codes::STRATEGY_NOT_REGISTERED,
            Some(record) if !record.active => codes::STRATEGY_NOT_ACTIVE,
            Some(record) if !record.accepts_maker_side(maker.quote_type) => {
                codes::STRATEGY_WRONG_MAKER_SIDE
            }
            Some(_) => codes::ORDER_EXPECTED_TO_BE_VALID,
        }
    }
}

fn timestamp_code(maker: &MakerOrder, now: i64) -> u32 {
    if maker.start_time > now {
        codes::START_TIME_IN_FUTURE
    } else if maker.end_time < now {
        codes::END_TIME_IN_PAST
    } else {
        codes::ORDER_EXPECTED_TO_BE_VALID
    }
}

fn currency_code(maker: &MakerOrder, currencies: &dyn CurrencyAllowlist) -> u32 {
    if !currencies.is_allowed(maker.currency) {
        return codes::CURRENCY_NOT_ALLOWED;
    }
    if maker.quote_type == QuoteType::Bid && maker.is_native_currency() {
        return codes::NATIVE_CURRENCY_INVALID_FOR_BID;
    }
    codes::ORDER_EXPECTED_TO_BE_VALID
}
