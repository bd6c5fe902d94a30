//! Signature authenticator.
//!
//! Two signer models:
//! - **Key-based**: a raw 64-byte (compact) or 65-byte ECDSA signature over
//!   the order digest; recovered and compared against the purported signer.
//! - **Contract-based**: delegated to a verification callback on the signer
//!   itself, which must answer with the magic acceptance value. This path
//!   calls untrusted code and therefore only ever runs inside the
//!   settlement engine's reentrancy guard.
//!
//! Authentication never mutates nonce state.

use alloy_primitives::{Address, B256, Signature, U256, b256};
use openswap_types::{OpenswapError, Result, constants};

/// Upper bound for a non-malleable `s`: half the secp256k1 curve order.
const HALF_CURVE_ORDER: B256 =
    b256!("7fffffffffffffffffffffffffffffff5d576e7357a4501ddfe92f46681b20a0");

/// Verification callback surface of a contract-based signer.
///
/// The implementor is untrusted; the engine invokes it strictly inside the
/// guarded region of a settlement call.
pub trait ContractSignerVerifier {
    /// Whether `signer` is a contract account (and must therefore be
    /// verified through the callback rather than key recovery).
    fn is_contract(&self, signer: Address) -> bool;

    /// Must return [`constants::CONTRACT_SIGNER_MAGIC_VALUE`] to accept.
    fn is_valid_signature(&self, signer: Address, digest: B256, signature: &[u8]) -> [u8; 4];
}

/// Verify a raw key signature over `digest` against `signer`.
///
/// # Errors
/// Each rejection cause is distinct: [`OpenswapError::InvalidSignatureLength`],
/// [`OpenswapError::BadSignatureV`], [`OpenswapError::BadSignatureS`],
/// [`OpenswapError::SignatureRecoveryFailed`],
/// [`OpenswapError::NullSignerAddress`], [`OpenswapError::SignerMismatch`].
pub fn verify_key_signature(digest: B256, signature: &[u8], signer: Address) -> Result<()> {
    let (r, s, parity) = split_signature(signature)?;

    if U256::from_be_bytes(s.0) > U256::from_be_bytes(HALF_CURVE_ORDER.0) {
        return Err(OpenswapError::BadSignatureS);
    }

    let sig = Signature::from_scalars_and_parity(r, s, parity);
    let recovered = sig
        .recover_address_from_prehash(&digest)
        .map_err(|_| OpenswapError::SignatureRecoveryFailed)?;

    if recovered == Address::ZERO {
        return Err(OpenswapError::NullSignerAddress);
    }
    if recovered != signer {
        return Err(OpenswapError::SignerMismatch {
            expected: signer,
            recovered,
        });
    }
    Ok(())
}

/// Verify through a contract-based signer's callback.
///
/// # Errors
/// Returns [`OpenswapError::ContractSignerRejected`] unless the callback
/// answers with the magic acceptance value.
pub fn verify_contract_signature(
    verifier: &dyn ContractSignerVerifier,
    digest: B256,
    signature: &[u8],
    signer: Address,
) -> Result<()> {
    let answer = verifier.is_valid_signature(signer, digest, signature);
    if answer != constants::CONTRACT_SIGNER_MAGIC_VALUE {
        return Err(OpenswapError::ContractSignerRejected(signer));
    }
    Ok(())
}

/// Split a 64/65-byte signature blob into `(r, s, parity)`.
///
/// 65-byte form is `r ‖ s ‖ v` with `v ∈ {27, 28}`; 64-byte form is the
/// EIP-2098 compact encoding `r ‖ yParityAndS`.
fn split_signature(signature: &[u8]) -> Result<(B256, B256, bool)> {
    match signature.len() {
        65 => {
            let r = B256::from_slice(&signature[..32]);
            let s = B256::from_slice(&signature[32..64]);
            let v = signature[64];
            if v != 27 && v != 28 {
                return Err(OpenswapError::BadSignatureV(v));
            }
            Ok((r, s, v == 28))
        }
        64 => {
            let r = B256::from_slice(&signature[..32]);
            let mut s = B256::from_slice(&signature[32..64]);
            let parity = s[0] & 0x80 != 0;
            s.0[0] &= 0x7f;
            Ok((r, s, parity))
        }
        len => Err(OpenswapError::InvalidSignatureLength(len)),
    }
}
