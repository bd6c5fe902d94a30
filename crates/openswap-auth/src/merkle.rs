//! Merkle batch commitments.
//!
//! A maker may sign one Merkle root covering up to 2^10 leaf orders instead
//! of signing each order individually. A leaf (the order's typed hash) is
//! authenticated by an inclusion proof against the signed root.
//!
//! Two details keep the signed digest unambiguous:
//! - Pair hashing is **sorted** (smaller node first), so proofs carry no
//!   left/right flags.
//! - The signed struct hash uses a **depth-specific type hash**; the leaf
//!   layer is padded to a power of two by duplicating the final leaf so
//!   every proof in one tree has the same length.

use std::sync::LazyLock;

use alloy_primitives::{B256, keccak256};
use openswap_types::{OpenswapError, Result, constants};

use crate::typed_hash::{MAKER_ORDER_TYPE, WordEncoder};

/// One inclusion proof supplied alongside a maker order.
#[derive(Debug, Clone)]
pub struct MerkleProofData {
    /// The maker-signed root.
    pub root: B256,
    /// Sibling hashes from leaf to root.
    pub proof: Vec<B256>,
}

/// Depth-indexed batch-order type hashes, precomputed for depths 1–10.
///
/// The type string nests one `[2]` per tree level, so a root of depth `d`
/// commits to exactly 2^d leaves and cannot be replayed at another depth.
static BATCH_ORDER_TYPEHASHES: LazyLock<[B256; constants::MAX_MERKLE_PROOF_DEPTH]> =
    LazyLock::new(|| {
        std::array::from_fn(|i| {
            let mut type_string = String::from("BatchOrder(Maker");
            for _ in 0..=i {
                type_string.push_str("[2]");
            }
            type_string.push_str(" tree)");
            type_string.push_str(MAKER_ORDER_TYPE);
            keccak256(type_string.as_bytes())
        })
    });

/// Struct hash of a signed batch-order commitment.
///
/// # Errors
/// Returns [`OpenswapError::MerkleProofTooLarge`] for depth 0 or any depth
/// above [`constants::MAX_MERKLE_PROOF_DEPTH`].
pub fn hash_batch_order(root: B256, depth: usize) -> Result<B256> {
    if depth == 0 || depth > constants::MAX_MERKLE_PROOF_DEPTH {
        return Err(OpenswapError::MerkleProofTooLarge(depth));
    }
    let mut enc = WordEncoder::new();
    enc.push_hash(BATCH_ORDER_TYPEHASHES[depth - 1]).push_hash(root);
    Ok(enc.finish())
}

/// Verify an inclusion proof linking `leaf` to `root`.
#[must_use]
pub fn verify_proof(leaf: B256, proof: &[B256], root: B256) -> bool {
    let mut node = leaf;
    for sibling in proof {
        node = hash_pair(node, *sibling);
    }
    node == root
}

/// Commutative pair hash: smaller node first.
fn hash_pair(a: B256, b: B256) -> B256 {
    let mut buf = [0u8; 64];
    if a <= b {
        buf[..32].copy_from_slice(a.as_slice());
        buf[32..].copy_from_slice(b.as_slice());
    } else {
        buf[..32].copy_from_slice(b.as_slice());
        buf[32..].copy_from_slice(a.as_slice());
    }
    keccak256(buf)
}

/// Builder for batch-order trees, used by makers (and tests) to derive the
/// root to sign and the per-leaf proofs to distribute.
#[derive(Debug)]
pub struct MerkleTree {
    levels: Vec<Vec<B256>>,
    leaf_count: usize,
}

impl MerkleTree {
    /// Build a tree over the given leaves.
    ///
    /// The leaf layer is padded to the next power of two by duplicating the
    /// final leaf, so all proofs share one depth.
    ///
    /// # Errors
    /// [`OpenswapError::MerkleTreeEmpty`] for zero leaves,
    /// [`OpenswapError::MerkleProofTooLarge`] for more than
    /// [`constants::MAX_BATCH_ORDERS`] leaves.
    pub fn new(leaves: Vec<B256>) -> Result<Self> {
        if leaves.is_empty() {
            return Err(OpenswapError::MerkleTreeEmpty);
        }
        if leaves.len() > constants::MAX_BATCH_ORDERS {
            return Err(OpenswapError::MerkleProofTooLarge(
                leaves.len().next_power_of_two().trailing_zeros() as usize,
            ));
        }

        let leaf_count = leaves.len();
        let padded = leaves.len().next_power_of_two().max(2);
        let mut layer = leaves;
        // Last leaf duplicated to fill the layer.
        let filler = layer[layer.len() - 1];
        layer.resize(padded, filler);

        let mut levels = vec![layer];
        while levels[levels.len() - 1].len() > 1 {
            let prev = &levels[levels.len() - 1];
            let next = prev
                .chunks_exact(2)
                .map(|pair| hash_pair(pair[0], pair[1]))
                .collect();
            levels.push(next);
        }
        Ok(Self { levels, leaf_count })
    }

    #[must_use]
    pub fn root(&self) -> B256 {
        self.levels[self.levels.len() - 1][0]
    }

    /// Proof length for every leaf of this tree.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    /// Number of real (unpadded) leaves.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// Inclusion proof for the leaf at `index`.
    ///
    /// # Errors
    /// Returns [`OpenswapError::MerkleProofInvalid`] when `index` is out of
    /// bounds.
    pub fn proof(&self, index: usize) -> Result<Vec<B256>> {
        if index >= self.leaf_count {
            return Err(OpenswapError::MerkleProofInvalid);
        }
        let mut proof = Vec::with_capacity(self.depth());
        let mut idx = index;
        for level in &self.levels[..self.levels.len() - 1] {
            proof.push(level[idx ^ 1]);
            idx /= 2;
        }
        Ok(proof)
    }
}
