//! # openswap-settlement
//!
//! The OpenSwap settlement engine: the single mutator of replay-protection
//! state, strategy registrations, and the signing domain.
//!
//! - **Engine**: guarded entry points for single and batch settlement,
//!   nonce operations, and owner-gated administration.
//! - **Nonce ledger**: per-signer global, subset, and order nonces.
//! - **Fee distribution**: protocol, creator, and affiliate splits that
//!   sum back to the settled price exactly.
//! - **Order checker**: read-only per-category diagnostics for makers
//!   and indexers.
//!
//! The engine owns no external assets. Currency moves, asset transfers,
//! royalty lookups, currency allow-listing, and contract-signer callbacks
//! are all behind the [`adapters`] traits, injected per call.

pub mod adapters;
pub mod engine;
pub mod fees;
pub mod guard;
pub mod nonces;
pub mod validate;

pub use adapters::{
    AssetTransferProvider, Collaborators, ContractSignerVerifier, CreatorFeeOracle,
    CurrencyAllowlist, FungibleLedger,
};
pub use engine::{BatchOutcome, EngineConfig, OrderExecution, SettlementEngine};
pub use fees::{compute_fee_split, resolve_creator_fee};
pub use guard::ReentrancyGuard;
pub use nonces::NonceLedger;
