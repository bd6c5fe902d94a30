//! # openswap-types
//!
//! Shared types, errors, and constants for the **OpenSwap** settlement
//! engine.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Order model**: [`MakerOrder`], [`TakerOrder`], [`QuoteType`], [`AssetType`]
//! - **Nonce state machine**: [`OrderNonceStatus`], [`UserNonces`]
//! - **Strategy records**: [`StrategyRecord`], [`StrategyKind`]
//! - **Fee split**: [`FeeSplit`]
//! - **Events**: [`TradeEvent`]
//! - **Errors**: [`OpenswapError`] with `OSW_ERR_` prefix codes
//! - **Diagnostic codes**: `validation_codes` for the read-only checker
//! - **Constants**: fee ceilings, Merkle depth cap, protocol identity

pub mod constants;
pub mod error;
pub mod events;
pub mod fees;
pub mod nonce;
pub mod order;
pub mod strategy;
pub mod validation_codes;

// Re-export all primary types at crate root for ergonomic imports:
//   use openswap_types::{MakerOrder, QuoteType, OpenswapError, ...};

pub use error::*;
pub use events::*;
pub use fees::*;
pub use nonce::*;
pub use order::*;
pub use strategy::*;

// Constants and validation codes are accessed via their modules
// (not re-exported to avoid name collisions).
