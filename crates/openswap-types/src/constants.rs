//! System-wide constants for the OpenSwap settlement engine.

/// One hundred percent expressed in basis points.
pub const ONE_HUNDRED_PERCENT_BP: u16 = 10_000;

/// Global ceiling on any strategy's maximum protocol fee (25%).
pub const MAX_PROTOCOL_FEE_BP: u16 = 2_500;

/// Default cap on creator/royalty fees (10%) unless the engine is
/// configured with a different one.
pub const DEFAULT_MAX_CREATOR_FEE_BP: u16 = 1_000;

/// Maximum Merkle tree depth for batch order commitments. A tree of this
/// depth covers 2^10 = 1024 leaf orders; deeper proofs are rejected.
pub const MAX_MERKLE_PROOF_DEPTH: usize = 10;

/// Maximum number of leaf orders one signed Merkle root can cover.
pub const MAX_BATCH_ORDERS: usize = 1 << MAX_MERKLE_PROOF_DEPTH;

/// Magic acceptance value a contract-based signer must return from its
/// verification callback (ERC-1271 `isValidSignature` selector).
pub const CONTRACT_SIGNER_MAGIC_VALUE: [u8; 4] = [0x16, 0x26, 0xba, 0x7e];

/// EIP-712 signing-domain name bound into every order digest.
pub const PROTOCOL_NAME: &str = "OpenSwap";

/// EIP-712 signing-domain version.
pub const PROTOCOL_VERSION: &str = "2";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
