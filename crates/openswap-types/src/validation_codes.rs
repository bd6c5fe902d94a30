//! Numeric diagnostic codes returned by the read-only order checker.
//!
//! Codes never abort execution — they only inform. Each maker order maps to
//! a fixed-width array of [`CRITERIA_GROUPS`] slots, one per category; zero
//! means the category passed. Code numbering mirrors the hard-error
//! subsystem grouping so clients can correlate the two tiers.

/// Number of diagnostic categories per order.
pub const CRITERIA_GROUPS: usize = 7;

/// Per-category slot indices into the code array.
pub mod group {
    pub const NONCE: usize = 0;
    pub const SIGNATURE: usize = 1;
    pub const TIMESTAMP: usize = 2;
    pub const ASSET_SHAPE: usize = 3;
    pub const CURRENCY: usize = 4;
    pub const FEES: usize = 5;
    pub const STRATEGY: usize = 6;
}

/// Category passed.
pub const ORDER_EXPECTED_TO_BE_VALID: u32 = 0;

// --- Nonce validity (group 0) ---
pub const GLOBAL_NONCE_INVALIDATED: u32 = 101;
pub const SUBSET_NONCE_CANCELLED: u32 = 102;
pub const ORDER_NONCE_EXECUTED_OR_CANCELLED: u32 = 103;
pub const ORDER_NONCE_PARTIAL_FILL_MISMATCH: u32 = 104;

// --- Signature validity (group 1) ---
pub const SIGNATURE_LENGTH_INVALID: u32 = 201;
pub const SIGNATURE_V_INVALID: u32 = 202;
pub const SIGNATURE_S_INVALID: u32 = 203;
pub const SIGNER_MISMATCH: u32 = 204;
pub const CONTRACT_SIGNER_REJECTION: u32 = 205;
pub const MERKLE_PROOF_TOO_LARGE: u32 = 206;
pub const MERKLE_PROOF_INVALID: u32 = 207;

// --- Timestamp validity (group 2) ---
pub const START_TIME_IN_FUTURE: u32 = 301;
pub const END_TIME_IN_PAST: u32 = 302;

// --- Asset-type / shape plausibility (group 3) ---
pub const ITEM_AMOUNT_LENGTH_MISMATCH: u32 = 401;
pub const ITEM_LIST_EMPTY: u32 = 402;
pub const AMOUNT_INVALID_FOR_ASSET_TYPE: u32 = 403;

// --- Currency allow-list (group 4) ---
pub const CURRENCY_NOT_ALLOWED: u32 = 501;
pub const NATIVE_CURRENCY_INVALID_FOR_BID: u32 = 502;

// --- Fee-cap compliance (group 5) ---
pub const CREATOR_FEE_ABOVE_CAP: u32 = 601;
pub const BUNDLE_ROYALTY_INCONSISTENT: u32 = 602;

// --- Strategy availability (group 6) ---
pub const STRATEGY_NOT_REGISTERED: u32 = 701;
pub const STRATEGY_NOT_ACTIVE: u32 = 702;
pub const STRATEGY_WRONG_MAKER_SIDE: u32 = 703;
