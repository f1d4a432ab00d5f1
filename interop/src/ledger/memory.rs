use std::{collections::BTreeMap, sync::Arc};

use anyhow::{bail, Error};
use indexmap::IndexMap;
use ledger_common::{
    account::AccountState,
    asset::AssetState,
    block::{Block, BlockHeader, BlockIndex},
    contract::ContractState,
    crypto::{Hashable, Uint160, Uint256},
    storage::StorageItem,
    transaction::Transaction,
};
use log::debug;

use super::{Ledger, LedgerWriter};
use crate::context::ScriptContainer;

/// Committed ledger state kept entirely in memory
///
/// Storage is ordered per contract so prefix searches are range scans.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    // Header hash per block index
    header_hashes: Vec<Uint256>,
    blocks: IndexMap<Uint256, Arc<Block>>,
    transactions: IndexMap<Uint256, (Arc<Transaction>, BlockIndex)>,
    contracts: IndexMap<Uint160, ContractState>,
    assets: IndexMap<Uint256, AssetState>,
    accounts: IndexMap<Uint160, AccountState>,
    storage: BTreeMap<Uint160, BTreeMap<Vec<u8>, StorageItem>>,
    // Script hashes to verify, per container hash
    verifying: IndexMap<Uint256, Vec<Uint160>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    // Append the next block of the chain and index its transactions
    pub fn add_block(&mut self, block: Block) -> Result<Uint256, Error> {
        let expected = self.header_hashes.len() as u64;
        if block.index as u64 != expected {
            bail!("block index {} does not extend a chain of {} blocks", block.index, expected);
        }

        let hash = block.hash();
        for tx in block.get_transactions() {
            self.transactions.insert(tx.hash(), (Arc::clone(tx), block.index));
        }
        debug!("memory ledger: added block {} at {}", hash, block.index);
        self.header_hashes.push(hash);
        self.blocks.insert(hash, Arc::new(block));
        Ok(hash)
    }

    pub fn put_account(&mut self, account: AccountState) {
        self.accounts.insert(account.script_hash, account);
    }

    // Declare which script hashes a container must be witnessed by
    pub fn set_script_hashes_for_verifying(&mut self, container: Uint256, hashes: Vec<Uint160>) {
        self.verifying.insert(container, hashes);
    }

    pub fn storage_len(&self, contract: &Uint160) -> usize {
        self.storage.get(contract).map_or(0, BTreeMap::len)
    }
}

impl Ledger for MemoryLedger {
    fn get_header_hash(&self, index: BlockIndex) -> Result<Option<Uint256>, Error> {
        Ok(self.header_hashes.get(index as usize).copied())
    }

    fn get_block(&self, hash: &Uint256) -> Result<Option<Arc<Block>>, Error> {
        Ok(self.blocks.get(hash).cloned())
    }

    fn get_header(&self, hash: &Uint256) -> Result<Option<Arc<BlockHeader>>, Error> {
        Ok(self.blocks.get(hash).map(|block| Arc::clone(block.get_header())))
    }

    fn get_transaction(&self, hash: &Uint256) -> Result<Option<(Arc<Transaction>, BlockIndex)>, Error> {
        Ok(self.transactions.get(hash).cloned())
    }

    fn get_contract_state(&self, hash: &Uint160) -> Result<Option<ContractState>, Error> {
        Ok(self.contracts.get(hash).cloned())
    }

    fn get_storage_item(&self, contract: &Uint160, key: &[u8]) -> Result<Option<StorageItem>, Error> {
        Ok(self.storage.get(contract).and_then(|items| items.get(key)).cloned())
    }

    fn get_storage_items_with_prefix(
        &self,
        contract: &Uint160,
        prefix: &[u8],
    ) -> Result<Vec<(Vec<u8>, StorageItem)>, Error> {
        let Some(items) = self.storage.get(contract) else {
            return Ok(Vec::new());
        };
        Ok(items
            .range(prefix.to_vec()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, item)| (key.clone(), item.clone()))
            .collect())
    }

    fn get_account_state_or_new(&self, hash: &Uint160) -> Result<AccountState, Error> {
        Ok(self
            .accounts
            .get(hash)
            .cloned()
            .unwrap_or_else(|| AccountState::new(*hash)))
    }

    fn get_asset_state(&self, id: &Uint256) -> Result<Option<AssetState>, Error> {
        Ok(self.assets.get(id).cloned())
    }

    fn get_script_hashes_for_verifying(&self, container: &ScriptContainer) -> Result<Vec<Uint160>, Error> {
        Ok(self
            .verifying
            .get(&container.hash())
            .cloned()
            .unwrap_or_default())
    }

    fn current_block_hash(&self) -> Result<Uint256, Error> {
        match self.header_hashes.last() {
            Some(hash) => Ok(*hash),
            None => bail!("chain has no block"),
        }
    }

    fn block_height(&self) -> Result<BlockIndex, Error> {
        Ok(self.header_hashes.len().saturating_sub(1) as BlockIndex)
    }
}

impl LedgerWriter for MemoryLedger {
    fn put_contract_state(&mut self, state: ContractState) -> Result<(), Error> {
        self.contracts.insert(state.script_hash(), state);
        Ok(())
    }

    fn delete_contract_state(&mut self, hash: &Uint160) -> Result<(), Error> {
        self.contracts.shift_remove(hash);
        Ok(())
    }

    fn put_asset_state(&mut self, state: AssetState) -> Result<(), Error> {
        self.assets.insert(state.id, state);
        Ok(())
    }

    fn put_storage_item(&mut self, contract: &Uint160, key: &[u8], item: StorageItem) -> Result<(), Error> {
        self.storage.entry(*contract).or_default().insert(key.to_vec(), item);
        Ok(())
    }

    fn delete_storage_item(&mut self, contract: &Uint160, key: &[u8]) -> Result<(), Error> {
        if let Some(items) = self.storage.get_mut(contract) {
            items.remove(key);
            if items.is_empty() {
                self.storage.remove(contract);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_common::transaction::TransactionType;

    fn block(index: u32, prev_hash: Uint256) -> Block {
        let header = BlockHeader::new(0, prev_hash, Uint256::zero(), 1_000 + index, index, 0, Uint160::zero());
        let miner = Transaction::new(TransactionType::Miner, index.to_le_bytes().to_vec());
        Block::new(header, vec![Arc::new(miner)])
    }

    #[test]
    fn test_chain_indexes() {
        let mut ledger = MemoryLedger::new();
        assert!(ledger.current_block_hash().is_err());

        let genesis = ledger.add_block(block(0, Uint256::zero())).unwrap();
        let next = ledger.add_block(block(1, genesis)).unwrap();

        assert_eq!(ledger.block_height().unwrap(), 1);
        assert_eq!(ledger.current_block_hash().unwrap(), next);
        assert_eq!(ledger.get_header_hash(0).unwrap(), Some(genesis));
        assert_eq!(ledger.get_header_hash(2).unwrap(), None);
        assert_eq!(ledger.get_header(&next).unwrap().unwrap().index, 1);
        assert!(ledger.add_block(block(5, next)).is_err());
    }

    #[test]
    fn test_transactions_are_indexed_with_height() {
        let mut ledger = MemoryLedger::new();
        let b = block(0, Uint256::zero());
        let tx_hash = b.get_transactions()[0].hash();
        ledger.add_block(b).unwrap();
        let (_, height) = ledger.get_transaction(&tx_hash).unwrap().unwrap();
        assert_eq!(height, 0);
    }

    #[test]
    fn test_prefix_scan() {
        let mut ledger = MemoryLedger::new();
        let contract = Uint160::new([1; 20]);
        let other = Uint160::new([2; 20]);
        for key in [&b"ab"[..], b"aa", b"b", b"a"] {
            ledger.put_storage_item(&contract, key, StorageItem::new(key.to_vec(), false)).unwrap();
        }
        ledger.put_storage_item(&other, b"aa", StorageItem::default()).unwrap();

        let keys: Vec<Vec<u8>> = ledger
            .get_storage_items_with_prefix(&contract, b"a")
            .unwrap()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec![b"a".to_vec(), b"aa".to_vec(), b"ab".to_vec()]);
        assert_eq!(ledger.storage_len(&contract), 4);

        ledger.delete_storage_item(&contract, b"b").unwrap();
        assert_eq!(ledger.storage_len(&contract), 3);
    }

    #[test]
    fn test_unknown_account_is_new() {
        let ledger = MemoryLedger::new();
        let hash = Uint160::new([9; 20]);
        let account = ledger.get_account_state_or_new(&hash).unwrap();
        assert_eq!(account, AccountState::new(hash));
    }
}
