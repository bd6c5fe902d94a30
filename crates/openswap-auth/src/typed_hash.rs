//! Typed-hash builder — EIP-712 style structured hashing.
//!
//! Every maker order is reduced to a 32-byte struct hash over abi-encoded
//! words; the final signed digest binds it to the signing domain with the
//! `\x19\x01` prefix. Dynamic fields (item lists, amounts, opaque
//! parameters) are hashed before encoding, per EIP-712.

use std::sync::LazyLock;

use alloy_primitives::{Address, B256, keccak256};
use openswap_types::MakerOrder;

/// Type string of the maker order struct.
pub const MAKER_ORDER_TYPE: &str = "Maker(uint8 quoteType,uint256 globalNonce,uint256 subsetNonce,uint256 orderNonce,uint256 strategyId,uint8 assetType,address collection,address currency,address signer,uint256 startTime,uint256 endTime,uint256 price,uint256[] itemIds,uint256[] amounts,bytes additionalParameters)";

/// Type string of the EIP-712 domain.
pub const DOMAIN_TYPE: &str =
    "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

static MAKER_ORDER_TYPEHASH: LazyLock<B256> =
    LazyLock::new(|| keccak256(MAKER_ORDER_TYPE.as_bytes()));

static DOMAIN_TYPEHASH: LazyLock<B256> = LazyLock::new(|| keccak256(DOMAIN_TYPE.as_bytes()));

/// Incremental abi-word encoder backing all struct hashes.
#[derive(Debug, Default)]
pub struct WordEncoder {
    buf: Vec<u8>,
}

impl WordEncoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_hash(&mut self, hash: B256) -> &mut Self {
        self.buf.extend_from_slice(hash.as_slice());
        self
    }

    pub fn push_u128(&mut self, value: u128) -> &mut Self {
        let mut word = [0u8; 32];
        word[16..].copy_from_slice(&value.to_be_bytes());
        self.buf.extend_from_slice(&word);
        self
    }

    pub fn push_u64(&mut self, value: u64) -> &mut Self {
        self.push_u128(u128::from(value))
    }

    pub fn push_u8(&mut self, value: u8) -> &mut Self {
        self.push_u128(u128::from(value))
    }

    /// Addresses are left-padded to a full word.
    pub fn push_address(&mut self, address: Address) -> &mut Self {
        let mut word = [0u8; 32];
        word[12..].copy_from_slice(address.as_slice());
        self.buf.extend_from_slice(&word);
        self
    }

    #[must_use]
    pub fn finish(&self) -> B256 {
        keccak256(&self.buf)
    }
}

/// Hash of a `uint256[]` value: keccak over the concatenated words.
#[must_use]
pub fn hash_u128_array(values: &[u128]) -> B256 {
    let mut enc = WordEncoder::new();
    for v in values {
        enc.push_u128(*v);
    }
    enc.finish()
}

/// EIP-712 struct hash of a maker order.
#[must_use]
pub fn maker_order_hash(order: &MakerOrder) -> B256 {
    let mut enc = WordEncoder::new();
    enc.push_hash(*MAKER_ORDER_TYPEHASH)
        .push_u8(order.quote_type as u8)
        .push_u64(order.global_nonce)
        .push_u64(order.subset_nonce)
        .push_u64(order.order_nonce)
        .push_u64(u64::from(order.strategy_id))
        .push_u8(order.asset_type as u8)
        .push_address(order.collection)
        .push_address(order.currency)
        .push_address(order.signer)
        .push_u64(order.start_time.unsigned_abs())
        .push_u64(order.end_time.unsigned_abs())
        .push_u128(order.price)
        .push_hash(hash_u128_array(&order.item_ids))
        .push_hash(hash_u128_array(&order.amounts))
        .push_hash(keccak256(&order.additional_parameters));
    enc.finish()
}

/// The signing-domain separator binding name, version, chain id, and the
/// engine's own address.
#[must_use]
pub fn domain_separator(name: &str, version: &str, chain_id: u64, contract: Address) -> B256 {
    let mut enc = WordEncoder::new();
    enc.push_hash(*DOMAIN_TYPEHASH)
        .push_hash(keccak256(name.as_bytes()))
        .push_hash(keccak256(version.as_bytes()))
        .push_u64(chain_id)
        .push_address(contract);
    enc.finish()
}

/// Final signed digest: `keccak(0x19 0x01 ‖ domain ‖ struct_hash)`.
#[must_use]
pub fn signing_digest(domain: B256, struct_hash: B256) -> B256 {
    let mut message = [0u8; 66];
    message[0] = 0x19;
    message[1] = 0x01;
    message[2..34].copy_from_slice(domain.as_slice());
    message[34..66].copy_from_slice(struct_hash.as_slice());
    keccak256(message)
}
