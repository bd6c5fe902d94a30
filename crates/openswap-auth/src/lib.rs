//! # openswap-auth
//!
//! Order authentication for the OpenSwap settlement engine:
//!
//! - **Typed-hash builder**: EIP-712 style struct hashing of maker orders,
//!   domain separators, and final `\x19\x01` digests.
//! - **Signature authenticator**: key-based ECDSA verification with
//!   malleability checks, plus the contract-based signer callback model.
//! - **Merkle batch commitments**: one signed root covering up to 2^10 leaf
//!   orders, with depth-indexed type hashes and sorted-pair proofs.
//! - **Domain binder**: cached signing domain with chain-drift detection.
//!
//! Nothing in this crate mutates engine state; authentication is pure
//! pass/fail.

pub mod domain;
pub mod merkle;
pub mod signature;
pub mod typed_hash;

pub use domain::DomainBinder;
pub use merkle::{MerkleProofData, MerkleTree, hash_batch_order, verify_proof};
pub use signature::{ContractSignerVerifier, verify_contract_signature, verify_key_signature};
pub use typed_hash::{maker_order_hash, signing_digest};
