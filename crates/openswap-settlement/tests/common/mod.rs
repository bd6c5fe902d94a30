//! Shared fixtures for the settlement integration tests.
#![allow(dead_code)]

use alloy_primitives::{Address, B256};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;

use openswap_auth::{maker_order_hash, signing_digest};
use openswap_settlement::adapters::{
    AllowAllCurrencies, MockAssetRegistry, MockContractSigners, MockCreatorFeeOracle, MockLedger,
};
use openswap_settlement::{
    Collaborators, EngineConfig, OrderExecution, SettlementEngine,
};
use openswap_types::{MakerOrder, QuoteType, StrategyKind, StrategyRecord, TakerOrder};

pub fn owner() -> Address {
    Address::repeat_byte(0xee)
}

pub fn fee_recipient() -> Address {
    Address::repeat_byte(0xfe)
}

pub fn taker() -> Address {
    Address::repeat_byte(0x0b)
}

pub fn erc20() -> Address {
    Address::repeat_byte(0x20)
}

pub fn creator() -> Address {
    Address::repeat_byte(0x99)
}

pub fn affiliate() -> Address {
    Address::repeat_byte(0xaf)
}

/// Engine with a 200bp standard / 150bp floor built-in strategy.
pub fn engine() -> SettlementEngine {
    SettlementEngine::new(EngineConfig {
        owner: owner(),
        protocol_fee_recipient: fee_recipient(),
        standard_protocol_fee_bp: 200,
        standard_min_total_fee_bp: 150,
        ..EngineConfig::default()
    })
    .unwrap()
}

/// Register the collection-offer strategy under id 1.
pub fn register_collection_offer(engine: &mut SettlementEngine) -> u32 {
    engine
        .add_strategy(
            owner(),
            StrategyRecord {
                id: 1,
                active: true,
                standard_protocol_fee_bp: 200,
                min_total_fee_bp: 150,
                max_protocol_fee_bp: 2_500,
                kind: StrategyKind::CollectionOffer,
                maker_side: Some(QuoteType::Bid),
            },
        )
        .unwrap();
    1
}

/// Register the dutch-auction strategy under id 2.
pub fn register_dutch_auction(engine: &mut SettlementEngine) -> u32 {
    engine
        .add_strategy(
            owner(),
            StrategyRecord {
                id: 2,
                active: true,
                standard_protocol_fee_bp: 200,
                min_total_fee_bp: 150,
                max_protocol_fee_bp: 2_500,
                kind: StrategyKind::DutchAuction,
                maker_side: Some(QuoteType::Ask),
            },
        )
        .unwrap();
    2
}

/// The collaborator set every test settles against.
pub struct World {
    pub ledger: MockLedger,
    pub assets: MockAssetRegistry,
    pub creator_fees: MockCreatorFeeOracle,
    pub currencies: AllowAllCurrencies,
    pub signers: MockContractSigners,
}

impl World {
    pub fn new() -> Self {
        Self {
            ledger: MockLedger::new(),
            assets: MockAssetRegistry::new(),
            creator_fees: MockCreatorFeeOracle::new(),
            currencies: AllowAllCurrencies,
            signers: MockContractSigners::new(),
        }
    }

    pub fn collab(&mut self) -> Collaborators<'_> {
        Collaborators {
            ledger: &mut self.ledger,
            assets: &mut self.assets,
            creator_fees: &self.creator_fees,
            currencies: &self.currencies,
            signers: &self.signers,
        }
    }
}

/// 65-byte `r ‖ s ‖ v` signature over a digest.
pub fn sign_digest(key: &PrivateKeySigner, digest: B256) -> Vec<u8> {
    let sig = key.sign_hash_sync(&digest).unwrap();
    let mut bytes = Vec::with_capacity(65);
    bytes.extend_from_slice(&sig.r().to_be_bytes::<32>());
    bytes.extend_from_slice(&sig.s().to_be_bytes::<32>());
    bytes.push(27 + u8::from(sig.v()));
    bytes
}

/// Sign a single maker order under the engine's current domain.
pub fn sign_order(
    engine: &SettlementEngine,
    key: &PrivateKeySigner,
    maker: MakerOrder,
) -> OrderExecution {
    let digest = signing_digest(engine.domain_separator(), maker_order_hash(&maker));
    let signature = sign_digest(key, digest);
    OrderExecution {
        taker: TakerOrder::new(taker()),
        maker,
        signature,
        merkle: None,
        affiliate: None,
    }
}

/// A signed single-item ask at `price` from a fresh maker.
pub fn signed_ask(
    engine: &SettlementEngine,
    key: &PrivateKeySigner,
    price: u128,
) -> OrderExecution {
    sign_order(engine, key, MakerOrder::dummy_ask(key.address(), price))
}
