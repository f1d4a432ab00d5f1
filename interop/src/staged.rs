use std::collections::BTreeMap;

use indexmap::IndexMap;
use ledger_common::{
    asset::AssetState,
    contract::ContractState,
    crypto::{Uint160, Uint256},
    storage::StorageItem,
};
use log::debug;

use crate::ledger::LedgerWriter;

/// Value of a staged key
///
/// `Deleted` is a tombstone: it hides the committed value until the
/// overlay is committed, at which point the committed value is removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Staged<T> {
    Present(T),
    Deleted,
}

impl<T> Staged<T> {
    pub fn as_present(&self) -> Option<&T> {
        match self {
            Staged::Present(value) => Some(value),
            Staged::Deleted => None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        matches!(self, Staged::Deleted)
    }
}

/// Pending writes of one execution
///
/// Reads go through the overlay before the committed ledger. Nothing here
/// reaches the ledger unless `commit` is called for an accepted execution.
#[derive(Debug, Default)]
pub struct StagedStore {
    // Ordered by contract then key, so commits are deterministic
    storage: BTreeMap<(Uint160, Vec<u8>), Staged<StorageItem>>,
    contracts: IndexMap<Uint160, Staged<ContractState>>,
    assets: IndexMap<Uint256, AssetState>,
}

impl StagedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty() && self.contracts.is_empty() && self.assets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.storage.len() + self.contracts.len() + self.assets.len()
    }

    pub fn get_storage(&self, contract: &Uint160, key: &[u8]) -> Option<&Staged<StorageItem>> {
        self.storage.get(&(*contract, key.to_vec()))
    }

    pub fn put_storage(&mut self, contract: &Uint160, key: &[u8], item: StorageItem) {
        self.storage.insert((*contract, key.to_vec()), Staged::Present(item));
    }

    pub fn delete_storage(&mut self, contract: &Uint160, key: &[u8]) {
        self.storage.insert((*contract, key.to_vec()), Staged::Deleted);
    }

    // Staged entries of one contract, tombstones included, in key order
    pub fn storage_entries<'a>(
        &'a self,
        contract: &'a Uint160,
    ) -> impl Iterator<Item = (&'a [u8], &'a Staged<StorageItem>)> + 'a {
        self.storage
            .range((*contract, Vec::new())..)
            .take_while(move |((owner, _), _)| owner == contract)
            .map(|((_, key), value)| (key.as_slice(), value))
    }

    pub fn get_contract(&self, hash: &Uint160) -> Option<&Staged<ContractState>> {
        self.contracts.get(hash)
    }

    pub fn put_contract(&mut self, state: ContractState) {
        self.contracts.insert(state.script_hash(), Staged::Present(state));
    }

    pub fn delete_contract(&mut self, hash: &Uint160) {
        self.contracts.insert(*hash, Staged::Deleted);
    }

    // True only for contracts written (not deleted) by this execution
    pub fn has_staged_contract(&self, hash: &Uint160) -> bool {
        matches!(self.contracts.get(hash), Some(Staged::Present(_)))
    }

    pub fn get_asset(&self, id: &Uint256) -> Option<&AssetState> {
        self.assets.get(id)
    }

    pub fn put_asset(&mut self, state: AssetState) {
        self.assets.insert(state.id, state);
    }

    /// Write every staged change to the ledger
    ///
    /// Contracts are applied first, then assets, then storage in
    /// (contract, key) order.
    pub fn commit(self, writer: &mut dyn LedgerWriter) -> Result<(), anyhow::Error> {
        if log::log_enabled!(log::Level::Debug) {
            debug!(
                "committing staged changes: {} storage, {} contracts, {} assets",
                self.storage.len(),
                self.contracts.len(),
                self.assets.len()
            );
        }

        for (hash, staged) in self.contracts {
            match staged {
                Staged::Present(state) => writer.put_contract_state(state)?,
                Staged::Deleted => writer.delete_contract_state(&hash)?,
            }
        }
        for (_, asset) in self.assets {
            writer.put_asset_state(asset)?;
        }
        for ((contract, key), staged) in self.storage {
            match staged {
                Staged::Present(item) => writer.put_storage_item(&contract, &key, item)?,
                Staged::Deleted => writer.delete_storage_item(&contract, &key)?,
            }
        }
        Ok(())
    }
}
