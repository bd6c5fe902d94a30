//! Collaborator interfaces consumed by the settlement engine.
//!
//! The engine never holds these: callers pass a [`Collaborators`] bundle
//! of mutable borrows into each entry point, keeping ownership (and test
//! inspection) with the host. Everything behind these traits is untrusted;
//! the engine only ever invokes them inside the reentrancy guard.
//!
//! In-memory adapters for tests live behind the `test-helpers` feature.

use alloy_primitives::Address;
use openswap_types::{AssetType, Result};

pub use openswap_auth::ContractSignerVerifier;

/// Fungible currency ledger. The zero address denotes the native currency.
pub trait FungibleLedger {
    /// Move `amount` of `currency` from `from` to `to`.
    ///
    /// # Errors
    /// [`openswap_types::OpenswapError::InsufficientBalance`] or a
    /// transfer-specific failure.
    fn transfer(&mut self, currency: Address, from: Address, to: Address, amount: u128)
    -> Result<()>;
}

/// Asset-transfer adapter keyed by asset type.
pub trait AssetTransferProvider {
    /// Move the listed items from `from` to `to`.
    ///
    /// # Errors
    /// [`openswap_types::OpenswapError::TransferFailed`] when `from` does
    /// not own the items (or any adapter-specific failure).
    fn transfer(
        &mut self,
        asset_type: AssetType,
        collection: Address,
        from: Address,
        to: Address,
        item_ids: &[u128],
        amounts: &[u128],
    ) -> Result<()>;
}

/// Creator-fee (royalty) lookup oracle.
pub trait CreatorFeeOracle {
    /// Royalty recipient and rate (basis points) for one item, if any.
    fn creator_fee_info(&self, collection: Address, item_id: u128) -> Option<(Address, u16)>;
}

/// Currency allow-list membership check.
pub trait CurrencyAllowlist {
    fn is_allowed(&self, currency: Address) -> bool;
}

/// The full collaborator bundle one settlement call runs against.
pub struct Collaborators<'a> {
    pub ledger: &'a mut dyn FungibleLedger,
    pub assets: &'a mut dyn AssetTransferProvider,
    pub creator_fees: &'a dyn CreatorFeeOracle,
    pub currencies: &'a dyn CurrencyAllowlist,
    pub signers: &'a dyn ContractSignerVerifier,
}

// ===================================================================
// In-memory adapters for tests
// ===================================================================

#[cfg(any(test, feature = "test-helpers"))]
pub use mock::{
    AllowAllCurrencies, MockAssetRegistry, MockContractSigners, MockCreatorFeeOracle, MockLedger,
    SetAllowlist,
};

#[cfg(any(test, feature = "test-helpers"))]
mod mock {
    use std::collections::{HashMap, HashSet};

    use alloy_primitives::{Address, B256};
    use openswap_types::{AssetType, OpenswapError, Result, constants};

    use super::{
        AssetTransferProvider, ContractSignerVerifier, CreatorFeeOracle, CurrencyAllowlist,
        FungibleLedger,
    };

    /// Balance-map currency ledger.
    #[derive(Debug, Default)]
    pub struct MockLedger {
        balances: HashMap<(Address, Address), u128>,
    }

    impl MockLedger {
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        pub fn deposit(&mut self, currency: Address, account: Address, amount: u128) {
            *self.balances.entry((currency, account)).or_default() += amount;
        }

        #[must_use]
        pub fn balance(&self, currency: Address, account: Address) -> u128 {
            self.balances.get(&(currency, account)).copied().unwrap_or(0)
        }
    }

    impl FungibleLedger for MockLedger {
        fn transfer(
            &mut self,
            currency: Address,
            from: Address,
            to: Address,
            amount: u128,
        ) -> Result<()> {
            let available = self.balance(currency, from);
            if available < amount {
                return Err(OpenswapError::InsufficientBalance {
                    needed: amount,
                    available,
                });
            }
            *self.balances.entry((currency, from)).or_default() -= amount;
            *self.balances.entry((currency, to)).or_default() += amount;
            Ok(())
        }
    }

    /// Ownership-enforcing asset registry for both asset families.
    #[derive(Debug, Default)]
    pub struct MockAssetRegistry {
        /// ERC-721: (collection, item) → owner.
        owners: HashMap<(Address, u128), Address>,
        /// ERC-1155: (collection, item, account) → units.
        units: HashMap<(Address, u128, Address), u128>,
    }

    impl MockAssetRegistry {
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        pub fn mint_erc721(&mut self, collection: Address, item_id: u128, owner: Address) {
            self.owners.insert((collection, item_id), owner);
        }

        pub fn mint_erc1155(
            &mut self,
            collection: Address,
            item_id: u128,
            owner: Address,
            amount: u128,
        ) {
            *self.units.entry((collection, item_id, owner)).or_default() += amount;
        }

        #[must_use]
        pub fn owner_of(&self, collection: Address, item_id: u128) -> Option<Address> {
            self.owners.get(&(collection, item_id)).copied()
        }

        #[must_use]
        pub fn units_of(&self, collection: Address, item_id: u128, account: Address) -> u128 {
            self.units
                .get(&(collection, item_id, account))
                .copied()
                .unwrap_or(0)
        }
    }

    impl AssetTransferProvider for MockAssetRegistry {
        fn transfer(
            &mut self,
            asset_type: AssetType,
            collection: Address,
            from: Address,
            to: Address,
            item_ids: &[u128],
            amounts: &[u128],
        ) -> Result<()> {
            match asset_type {
                AssetType::Erc721 => {
                    for &item_id in item_ids {
                        let owner = self.owner_of(collection, item_id);
                        if owner != Some(from) {
                            return Err(OpenswapError::TransferFailed {
                                reason: format!("item {item_id} not owned by {from}"),
                            });
                        }
                    }
                    for &item_id in item_ids {
                        self.owners.insert((collection, item_id), to);
                    }
                }
                AssetType::Erc1155 => {
                    for (&item_id, &amount) in item_ids.iter().zip(amounts) {
                        let held = self.units_of(collection, item_id, from);
                        if held < amount {
                            return Err(OpenswapError::TransferFailed {
                                reason: format!(
                                    "item {item_id}: {from} holds {held}, needs {amount}"
                                ),
                            });
                        }
                    }
                    for (&item_id, &amount) in item_ids.iter().zip(amounts) {
                        *self.units.entry((collection, item_id, from)).or_default() -= amount;
                        *self.units.entry((collection, item_id, to)).or_default() += amount;
                    }
                }
            }
            Ok(())
        }
    }

    /// Map-backed royalty oracle: per-collection default plus per-item
    /// overrides.
    #[derive(Debug, Default)]
    pub struct MockCreatorFeeOracle {
        collections: HashMap<Address, (Address, u16)>,
        items: HashMap<(Address, u128), (Address, u16)>,
    }

    impl MockCreatorFeeOracle {
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_collection_royalty(
            &mut self,
            collection: Address,
            recipient: Address,
            bp: u16,
        ) {
            self.collections.insert(collection, (recipient, bp));
        }

        pub fn set_item_royalty(
            &mut self,
            collection: Address,
            item_id: u128,
            recipient: Address,
            bp: u16,
        ) {
            self.items.insert((collection, item_id), (recipient, bp));
        }
    }

    impl CreatorFeeOracle for MockCreatorFeeOracle {
        fn creator_fee_info(&self, collection: Address, item_id: u128) -> Option<(Address, u16)> {
            self.items
                .get(&(collection, item_id))
                .or_else(|| self.collections.get(&collection))
                .copied()
        }
    }

    /// Allow-list accepting everything (native currency included).
    #[derive(Debug, Default)]
    pub struct AllowAllCurrencies;

    impl CurrencyAllowlist for AllowAllCurrencies {
        fn is_allowed(&self, _currency: Address) -> bool {
            true
        }
    }

    /// Set-backed allow-list.
    #[derive(Debug, Default)]
    pub struct SetAllowlist {
        allowed: HashSet<Address>,
    }

    impl SetAllowlist {
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        pub fn allow(&mut self, currency: Address) {
            self.allowed.insert(currency);
        }
    }

    impl CurrencyAllowlist for SetAllowlist {
        fn is_allowed(&self, currency: Address) -> bool {
            self.allowed.contains(&currency)
        }
    }

    /// Scriptable contract-signer registry: listed signers are contracts,
    /// and accept or reject wholesale.
    #[derive(Debug, Default)]
    pub struct MockContractSigners {
        contracts: HashMap<Address, bool>,
    }

    impl MockContractSigners {
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        pub fn register(&mut self, signer: Address, accept: bool) {
            self.contracts.insert(signer, accept);
        }
    }

    impl ContractSignerVerifier for MockContractSigners {
        fn is_contract(&self, signer: Address) -> bool {
            self.contracts.contains_key(&signer)
        }

        fn is_valid_signature(&self, signer: Address, _digest: B256, _sig: &[u8]) -> [u8; 4] {
            if self.contracts.get(&signer) == Some(&true) {
                constants::CONTRACT_SIGNER_MAGIC_VALUE
            } else {
                [0; 4]
            }
        }
    }
}
