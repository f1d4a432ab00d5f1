mod memory;

use std::sync::Arc;

use anyhow::Error;
use ledger_common::{
    account::AccountState,
    asset::AssetState,
    block::{Block, BlockHeader, BlockIndex},
    contract::ContractState,
    crypto::{Uint160, Uint256},
    storage::StorageItem,
    transaction::Transaction,
};

use crate::context::ScriptContainer;

pub use memory::MemoryLedger;

/// Read access to the committed ledger state
///
/// Misses are `Ok(None)`, errors are reserved for backend failures.
pub trait Ledger {
    // Hash of the header at `index`, if the chain is that high
    fn get_header_hash(&self, index: BlockIndex) -> Result<Option<Uint256>, Error>;

    fn get_block(&self, hash: &Uint256) -> Result<Option<Arc<Block>>, Error>;

    fn get_header(&self, hash: &Uint256) -> Result<Option<Arc<BlockHeader>>, Error>;

    // Transaction with the height of the block that includes it
    fn get_transaction(&self, hash: &Uint256) -> Result<Option<(Arc<Transaction>, BlockIndex)>, Error>;

    fn get_contract_state(&self, hash: &Uint160) -> Result<Option<ContractState>, Error>;

    fn get_storage_item(&self, contract: &Uint160, key: &[u8]) -> Result<Option<StorageItem>, Error>;

    // Every item of `contract` whose key starts with `prefix`, keys are
    // returned whole (prefix included) in no particular order
    fn get_storage_items_with_prefix(
        &self,
        contract: &Uint160,
        prefix: &[u8],
    ) -> Result<Vec<(Vec<u8>, StorageItem)>, Error>;

    // Unknown accounts come back as a fresh empty state
    fn get_account_state_or_new(&self, hash: &Uint160) -> Result<AccountState, Error>;

    fn get_asset_state(&self, id: &Uint256) -> Result<Option<AssetState>, Error>;

    // Script hashes whose witnesses the container must carry
    fn get_script_hashes_for_verifying(&self, container: &ScriptContainer) -> Result<Vec<Uint160>, Error>;

    fn current_block_hash(&self) -> Result<Uint256, Error>;

    fn block_height(&self) -> Result<BlockIndex, Error>;
}

/// Write access used when an accepted execution is merged into the ledger
pub trait LedgerWriter {
    fn put_contract_state(&mut self, state: ContractState) -> Result<(), Error>;

    fn delete_contract_state(&mut self, hash: &Uint160) -> Result<(), Error>;

    fn put_asset_state(&mut self, state: AssetState) -> Result<(), Error>;

    fn put_storage_item(&mut self, contract: &Uint160, key: &[u8], item: StorageItem) -> Result<(), Error>;

    fn delete_storage_item(&mut self, contract: &Uint160, key: &[u8]) -> Result<(), Error>;
}
