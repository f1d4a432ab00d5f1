// Shared fixtures for the interop integration tests
#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Error;
use ledger_common::{
    account::AccountState,
    asset::AssetState,
    block::{Block, BlockHeader, BlockIndex},
    contract::{ContractProperties, ContractState, ParamType},
    crypto::{Hashable, PublicKey, Uint160, Uint256},
    storage::StorageItem,
    transaction::{Transaction, TransactionType},
};
use ledger_interop::{
    bridge::{unwrap, InteropObject},
    invoke,
    vm::{Engine, StackItem},
    InteropContext, InteropError, Ledger, LedgerWriter, MemoryLedger, ScriptContainer,
};

// secp256r1 generator point, compressed
pub const OWNER_KEY: &str = "036b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296";

pub fn owner_key() -> PublicKey {
    PublicKey::from_bytes(&hex::decode(OWNER_KEY).unwrap()).unwrap()
}

pub fn contract(script: &[u8], properties: ContractProperties) -> ContractState {
    ContractState {
        script: script.to_vec(),
        param_list: vec![ParamType::String, ParamType::Array],
        return_type: ParamType::ByteArray,
        properties,
        name: "test".into(),
        code_version: "1.0".into(),
        author: "dev".into(),
        email: "dev@example.org".into(),
        description: "integration test contract".into(),
    }
}

pub fn storage_contract(script: &[u8]) -> ContractState {
    contract(script, ContractProperties::HAS_STORAGE)
}

// Arguments of Neo.Contract.Create / Migrate in pop order
pub fn contract_args(state: &ContractState) -> Vec<StackItem> {
    vec![
        StackItem::from(state.script.clone()),
        StackItem::from(state.param_list.iter().map(|p| *p as u8).collect::<Vec<_>>()),
        StackItem::from(state.return_type as u8),
        StackItem::from(state.properties.bits()),
        StackItem::from(state.name.as_slice()),
        StackItem::from(state.code_version.as_slice()),
        StackItem::from(state.author.as_slice()),
        StackItem::from(state.email.as_slice()),
        StackItem::from(state.description.as_slice()),
    ]
}

/// Ledger with `count` chained blocks, each carrying one miner transaction
/// and `count` as its timestamp base
pub fn chain(count: u32) -> (MemoryLedger, Vec<Arc<Block>>) {
    let mut ledger = MemoryLedger::new();
    let mut blocks = Vec::new();
    let mut prev = Uint256::zero();
    for index in 0..count {
        let miner = Transaction::new(TransactionType::Miner, index.to_le_bytes().to_vec());
        let header = BlockHeader::new(0, prev, Uint256::zero(), 1_500_000_000 + index * 15, index, index as u64, Uint160::zero());
        let block = Block::new(header, vec![Arc::new(miner)]);
        prev = ledger.add_block(block.clone()).unwrap();
        blocks.push(Arc::new(block));
    }
    (ledger, blocks)
}

pub fn deploy(ledger: &mut MemoryLedger, state: ContractState) -> Uint160 {
    let hash = state.script_hash();
    ledger.put_contract_state(state).unwrap();
    hash
}

pub fn invocation(payload: &[u8]) -> Arc<Transaction> {
    Arc::new(Transaction::new(TransactionType::Invocation, payload.to_vec()))
}

// RUST_LOG=trace shows the dispatched syscalls
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn engine_for(script: &[u8]) -> Engine {
    init_logging();
    let mut engine = Engine::new();
    engine.load_script(script.to_vec());
    engine
}

/// Push `args` so that the first one is popped first, then run the syscall
pub fn call(
    ctx: &mut InteropContext<'_>,
    engine: &mut Engine,
    name: &str,
    args: Vec<StackItem>,
) -> Result<(), InteropError> {
    for arg in args.into_iter().rev() {
        engine.evaluation_stack_mut().push(arg);
    }
    invoke(name, ctx, engine)
}

// Run a syscall expected to succeed and return what it pushed
pub fn call_ok(ctx: &mut InteropContext<'_>, engine: &mut Engine, name: &str, args: Vec<StackItem>) -> StackItem {
    call(ctx, engine, name, args).unwrap();
    engine.evaluation_stack_mut().pop().unwrap()
}

pub fn handle<T: InteropObject>(item: &StackItem) -> T {
    unwrap(item).unwrap()
}

pub fn bytes(item: &StackItem) -> Vec<u8> {
    item.try_bytes().unwrap()
}

pub fn reversed(hash: &Uint256) -> StackItem {
    StackItem::from(hash.to_reversed_bytes().to_vec())
}

pub fn tx_hash(tx: &Transaction) -> Uint256 {
    tx.hash()
}

/// Committed store whose prefix scans come back out of key order
///
/// Every other query is answered by the wrapped `MemoryLedger`.
pub struct ScrambledLedger {
    inner: MemoryLedger,
    seed: usize,
}

impl ScrambledLedger {
    pub fn new(inner: MemoryLedger, seed: usize) -> Self {
        Self { inner, seed }
    }
}

impl Ledger for ScrambledLedger {
    fn get_header_hash(&self, index: BlockIndex) -> Result<Option<Uint256>, Error> {
        self.inner.get_header_hash(index)
    }

    fn get_block(&self, hash: &Uint256) -> Result<Option<Arc<Block>>, Error> {
        self.inner.get_block(hash)
    }

    fn get_header(&self, hash: &Uint256) -> Result<Option<Arc<BlockHeader>>, Error> {
        self.inner.get_header(hash)
    }

    fn get_transaction(&self, hash: &Uint256) -> Result<Option<(Arc<Transaction>, BlockIndex)>, Error> {
        self.inner.get_transaction(hash)
    }

    fn get_contract_state(&self, hash: &Uint160) -> Result<Option<ContractState>, Error> {
        self.inner.get_contract_state(hash)
    }

    fn get_storage_item(&self, contract: &Uint160, key: &[u8]) -> Result<Option<StorageItem>, Error> {
        self.inner.get_storage_item(contract, key)
    }

    fn get_storage_items_with_prefix(
        &self,
        contract: &Uint160,
        prefix: &[u8],
    ) -> Result<Vec<(Vec<u8>, StorageItem)>, Error> {
        let mut items = self.inner.get_storage_items_with_prefix(contract, prefix)?;
        items.reverse();
        if !items.is_empty() {
            let mid = self.seed % items.len();
            items.rotate_left(mid);
        }
        Ok(items)
    }

    fn get_account_state_or_new(&self, hash: &Uint160) -> Result<AccountState, Error> {
        self.inner.get_account_state_or_new(hash)
    }

    fn get_asset_state(&self, id: &Uint256) -> Result<Option<AssetState>, Error> {
        self.inner.get_asset_state(id)
    }

    fn get_script_hashes_for_verifying(&self, container: &ScriptContainer) -> Result<Vec<Uint160>, Error> {
        self.inner.get_script_hashes_for_verifying(container)
    }

    fn current_block_hash(&self) -> Result<Uint256, Error> {
        self.inner.current_block_hash()
    }

    fn block_height(&self) -> Result<BlockIndex, Error> {
        self.inner.block_height()
    }
}
