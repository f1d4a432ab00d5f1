use std::{collections::BTreeMap, sync::Arc};

use ledger_common::{
    asset::AssetState,
    block::Block,
    contract::ContractState,
    crypto::{Hashable, Uint160, Uint256},
    storage::StorageItem,
    transaction::Transaction,
    trigger::TriggerType,
};

use crate::{
    bridge::wrap,
    error::InteropError,
    events::{EventRecord, EventSink},
    ledger::Ledger,
    staged::{Staged, StagedStore},
    vm::StackItem,
};

/// Object whose witnesses are being checked by the execution
#[derive(Clone, Debug)]
pub enum ScriptContainer {
    Transaction(Arc<Transaction>),
    Block(Arc<Block>),
}

impl ScriptContainer {
    pub fn hash(&self) -> Uint256 {
        match self {
            ScriptContainer::Transaction(tx) => tx.hash(),
            ScriptContainer::Block(block) => block.hash(),
        }
    }

    pub fn to_stack_item(&self) -> StackItem {
        match self {
            ScriptContainer::Transaction(tx) => wrap(Arc::clone(tx)),
            ScriptContainer::Block(block) => wrap(Arc::clone(block)),
        }
    }
}

/// State shared by every syscall of one script execution
///
/// The staged overlay is owned here: it is dropped with the context when
/// the execution faults and handed to `into_staged` once it is accepted.
pub struct InteropContext<'a> {
    trigger: TriggerType,
    ledger: &'a dyn Ledger,
    container: Option<ScriptContainer>,
    // Block being verified or persisted, if any
    block: Option<Arc<Block>>,
    staged: StagedStore,
    events: &'a mut dyn EventSink,
}

impl<'a> InteropContext<'a> {
    pub fn new(trigger: TriggerType, ledger: &'a dyn Ledger, events: &'a mut dyn EventSink) -> Self {
        Self {
            trigger,
            ledger,
            container: None,
            block: None,
            staged: StagedStore::new(),
            events,
        }
    }

    pub fn with_container(mut self, container: ScriptContainer) -> Self {
        self.container = Some(container);
        self
    }

    pub fn with_block(mut self, block: Arc<Block>) -> Self {
        self.block = Some(block);
        self
    }

    pub fn trigger(&self) -> TriggerType {
        self.trigger
    }

    pub fn ledger(&self) -> &'a dyn Ledger {
        self.ledger
    }

    pub fn container(&self) -> Option<&ScriptContainer> {
        self.container.as_ref()
    }

    pub fn block(&self) -> Option<&Arc<Block>> {
        self.block.as_ref()
    }

    pub fn staged(&self) -> &StagedStore {
        &self.staged
    }

    pub fn staged_mut(&mut self) -> &mut StagedStore {
        &mut self.staged
    }

    // Pending writes of an accepted execution, to be committed by the caller
    pub fn into_staged(self) -> StagedStore {
        self.staged
    }

    pub fn emit(&mut self, record: EventRecord) {
        self.events.emit(record);
    }

    // Contract and asset lifecycle operations are application only
    pub fn require_application(&self) -> Result<(), InteropError> {
        if self.trigger.is_application() {
            Ok(())
        } else {
            Err(InteropError::TriggerNotApplication { current: self.trigger })
        }
    }

    // Transaction being processed, required by operations deriving ids from it
    pub fn transaction(&self) -> Result<&Arc<Transaction>, InteropError> {
        match &self.container {
            Some(ScriptContainer::Transaction(tx)) => Ok(tx),
            _ => Err(InteropError::MissingScriptContainer),
        }
    }

    pub fn get_contract(&self, hash: &Uint160) -> Result<Option<ContractState>, InteropError> {
        match self.staged.get_contract(hash) {
            Some(staged) => Ok(staged.as_present().cloned()),
            None => Ok(self.ledger.get_contract_state(hash)?),
        }
    }

    pub fn get_asset(&self, id: &Uint256) -> Result<Option<AssetState>, InteropError> {
        match self.staged.get_asset(id) {
            Some(asset) => Ok(Some(asset.clone())),
            None => Ok(self.ledger.get_asset_state(id)?),
        }
    }

    pub fn get_storage_item(&self, contract: &Uint160, key: &[u8]) -> Result<Option<StorageItem>, InteropError> {
        match self.staged.get_storage(contract, key) {
            Some(staged) => Ok(staged.as_present().cloned()),
            None => Ok(self.ledger.get_storage_item(contract, key)?),
        }
    }

    // Committed items of a contract with the staged changes applied
    pub fn get_storage_items(&self, contract: &Uint160) -> Result<BTreeMap<Vec<u8>, StorageItem>, InteropError> {
        let mut items: BTreeMap<Vec<u8>, StorageItem> = self
            .ledger
            .get_storage_items_with_prefix(contract, &[])?
            .into_iter()
            .collect();
        for (key, staged) in self.staged.storage_entries(contract) {
            match staged {
                Staged::Present(item) => {
                    items.insert(key.to_vec(), item.clone());
                }
                Staged::Deleted => {
                    items.remove(key);
                }
            }
        }
        Ok(items)
    }
}
