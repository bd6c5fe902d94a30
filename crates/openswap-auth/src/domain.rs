//! Domain & chain binder.
//!
//! Caches the signing-domain separator derived from the protocol's name,
//! version, the chain id, and the engine's own address. Signed-order
//! processing fails when the live chain id drifts from the bound one, so a
//! fork or migration cannot replay signatures across networks.

use alloy_primitives::{Address, B256};
use openswap_types::{OpenswapError, Result};

use crate::typed_hash::{domain_separator, signing_digest};

/// Cached signing domain with chain-drift detection.
#[derive(Debug, Clone)]
pub struct DomainBinder {
    name: String,
    version: String,
    chain_id: u64,
    contract: Address,
    separator: B256,
}

impl DomainBinder {
    #[must_use]
    pub fn new(name: &str, version: &str, chain_id: u64, contract: Address) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            chain_id,
            contract,
            separator: domain_separator(name, version, chain_id, contract),
        }
    }

    /// The cached separator.
    #[must_use]
    pub fn separator(&self) -> B256 {
        self.separator
    }

    /// The chain id the cached separator is bound to.
    #[must_use]
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Full signed digest for a struct hash under this domain.
    #[must_use]
    pub fn digest(&self, struct_hash: B256) -> B256 {
        signing_digest(self.separator, struct_hash)
    }

    /// Fail when the live chain id no longer matches the bound one.
    ///
    /// # Errors
    /// Returns [`OpenswapError::ChainIdMismatch`] on drift.
    pub fn assert_fresh(&self, current_chain_id: u64) -> Result<()> {
        if current_chain_id != self.chain_id {
            return Err(OpenswapError::ChainIdMismatch {
                bound: self.chain_id,
                current: current_chain_id,
            });
        }
        Ok(())
    }

    /// Recompute the separator against the live chain id.
    ///
    /// # Errors
    /// Returns [`OpenswapError::SameDomainSeparator`] when the recomputed
    /// value equals the cached one (redundant update).
    pub fn refresh(&mut self, current_chain_id: u64) -> Result<B256> {
        let next = domain_separator(&self.name, &self.version, current_chain_id, self.contract);
        if next == self.separator {
            return Err(OpenswapError::SameDomainSeparator);
        }
        tracing::info!(
            old_chain_id = self.chain_id,
            new_chain_id = current_chain_id,
            "domain separator updated"
        );
        self.chain_id = current_chain_id;
        self.separator = next;
        Ok(next)
    }
}
