//! Error types for the OpenSwap settlement engine.
//!
//! All errors use the `OSW_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Order shape / content errors
//! - 2xx: Nonce / replay-protection errors
//! - 3xx: Signature errors
//! - 4xx: Merkle batch-commitment errors
//! - 5xx: Strategy errors
//! - 6xx: Fee errors
//! - 7xx: Settlement / transfer / reentrancy errors
//! - 8xx: Domain / admin errors
//! - 9xx: General / internal errors

use alloy_primitives::Address;
use thiserror::Error;

/// Central error enum for all OpenSwap operations.
///
/// Every fatal condition is distinguishable by a unique variant so callers
/// can branch on cause. Nothing here is swallowed silently; the only place
/// an error is caught rather than propagated is the explicit skip path of a
/// non-atomic batch.
#[derive(Debug, Error)]
pub enum OpenswapError {
    // =================================================================
    // Order Errors (1xx)
    // =================================================================
    /// The order is structurally invalid (empty or mismatched item/amount
    /// lists, price mismatch, undecodable strategy parameters, ...).
    #[error("OSW_ERR_100: Invalid order: {reason}")]
    OrderInvalid { reason: String },

    /// The order's quote type does not match the entry point it was
    /// submitted through (e.g. a bid passed to `execute_taker_bid`).
    #[error("OSW_ERR_101: Quote type does not match entry point")]
    QuoteTypeInvalid,

    /// The order's validity window does not cover the current time.
    #[error("OSW_ERR_102: Order outside of time range [{start}, {end}], now {now}")]
    OutsideOfTimeRange { start: i64, end: i64, now: i64 },

    /// The settlement currency is not allowed for this order side, or is
    /// inconsistent across a non-atomic batch.
    #[error("OSW_ERR_103: Invalid settlement currency {0}")]
    CurrencyInvalid(Address),

    /// An input array was empty or mismatched in length.
    #[error("OSW_ERR_104: Invalid input lengths")]
    LengthsInvalid,

    // =================================================================
    // Nonce Errors (2xx)
    // =================================================================
    /// Replay protection rejected the order: stale global nonce, cancelled
    /// subset nonce, or an order nonce that no longer permits this fill.
    #[error("OSW_ERR_200: Wrong nonces")]
    WrongNonces,

    // =================================================================
    // Signature Errors (3xx)
    // =================================================================
    /// The signature blob is neither 64 (compact) nor 65 bytes long.
    #[error("OSW_ERR_300: Invalid signature length: {0}")]
    InvalidSignatureLength(usize),

    /// The recovery parameter `v` is outside {27, 28}.
    #[error("OSW_ERR_301: Invalid signature parameter v: {0}")]
    BadSignatureV(u8),

    /// The `s` scalar lies in the upper half of the curve order (malleable).
    #[error("OSW_ERR_302: Invalid signature parameter s")]
    BadSignatureS,

    /// Recovery produced the zero address.
    #[error("OSW_ERR_303: Recovered signer is the null address")]
    NullSignerAddress,

    /// Recovery succeeded but yielded a different address than the
    /// purported signer.
    #[error("OSW_ERR_304: Signer mismatch: expected {expected}, recovered {recovered}")]
    SignerMismatch {
        expected: Address,
        recovered: Address,
    },

    /// The contract-based signer's verification callback did not return the
    /// magic acceptance value.
    #[error("OSW_ERR_305: Contract signer {0} rejected the signature")]
    ContractSignerRejected(Address),

    /// The ECDSA public-key recovery itself failed.
    #[error("OSW_ERR_306: Signature recovery failed")]
    SignatureRecoveryFailed,

    // =================================================================
    // Merkle Errors (4xx)
    // =================================================================
    /// The inclusion proof is empty or deeper than the supported maximum.
    #[error("OSW_ERR_400: Merkle proof too large: depth {0}")]
    MerkleProofTooLarge(usize),

    /// The inclusion proof does not link the order hash to the signed root.
    #[error("OSW_ERR_401: Merkle proof invalid")]
    MerkleProofInvalid,

    /// A Merkle tree cannot be built from zero leaves.
    #[error("OSW_ERR_402: Merkle tree has no leaves")]
    MerkleTreeEmpty,

    // =================================================================
    // Strategy Errors (5xx)
    // =================================================================
    /// The strategy id is unregistered, inactive, or restricted to the
    /// other maker side.
    #[error("OSW_ERR_500: Strategy {0} not available")]
    StrategyNotAvailable(u32),

    /// Strategy fee bounds violate the invariant
    /// `standard, minTotal <= maxProtocol <= global ceiling`.
    #[error("OSW_ERR_501: Strategy fee bounds invalid")]
    StrategyFeesInvalid,

    /// An auction-style strategy received a taker bid below the current
    /// settlement price.
    #[error("OSW_ERR_502: Bid {bid} below current price {current}")]
    BidTooLow { bid: u128, current: u128 },

    /// No strategy is registered under this id.
    #[error("OSW_ERR_503: Strategy {0} not found")]
    StrategyNotFound(u32),

    // =================================================================
    // Fee Errors (6xx)
    // =================================================================
    /// The creator fee rate exceeds the configured cap.
    #[error("OSW_ERR_600: Creator fee too high: {bp} bp")]
    CreatorFeeTooHigh { bp: u16 },

    /// Items of one bundle resolved to different royalty recipients or
    /// rates; the whole trade fails.
    #[error("OSW_ERR_601: Bundle royalty recipients or rates mismatch")]
    BundleRoyaltyMismatch,

    /// A basis-point rate above 100% was supplied.
    #[error("OSW_ERR_602: Percentage too high: {0} bp")]
    PercentageTooHigh(u16),

    // =================================================================
    // Settlement Errors (7xx)
    // =================================================================
    /// A guarded entry point was re-entered while another guarded call was
    /// still in flight.
    #[error("OSW_ERR_700: Reentrancy detected")]
    ReentrancyFail,

    /// An asset or currency transfer adapter failed.
    #[error("OSW_ERR_701: Transfer failed: {reason}")]
    TransferFailed { reason: String },

    /// Not enough ledger balance to fund the transfer.
    #[error("OSW_ERR_702: Insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: u128, available: u128 },

    /// Every sub-order of a non-atomic batch failed.
    #[error("OSW_ERR_703: No orders executed")]
    NoOrdersExecuted,

    // =================================================================
    // Domain / Admin Errors (8xx)
    // =================================================================
    /// The live chain id no longer matches the one bound into the signing
    /// domain; signed orders are stale.
    #[error("OSW_ERR_800: Chain id mismatch: domain bound to {bound}, running on {current}")]
    ChainIdMismatch { bound: u64, current: u64 },

    /// Domain recomputation produced the value already cached.
    #[error("OSW_ERR_801: Domain separator unchanged")]
    SameDomainSeparator,

    /// The caller is not authorized for this operation.
    #[error("OSW_ERR_802: Caller invalid")]
    CallerInvalid,

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("OSW_ERR_900: Internal error: {0}")]
    Internal(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, OpenswapError>;
