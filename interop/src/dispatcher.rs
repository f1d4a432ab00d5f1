// Syscall table: resolves a syscall name to its handler and runs it against
// the execution's context.

use indexmap::IndexMap;
use lazy_static::lazy_static;
use log::{log_enabled, trace, warn, Level};

use crate::{
    asset, blockchain, context::InteropContext, contract, error::InteropError, runtime, storage,
    vm::Engine, witness,
};

/// Handler signature shared by every syscall
///
/// A handler pops its arguments from the evaluation stack and pushes at most
/// one result. Any error faults the execution.
pub type SyscallHandler = fn(&mut InteropContext<'_>, &mut Engine) -> Result<(), InteropError>;

pub mod syscall_names {
    // ===== System =====
    pub const SYSTEM_RUNTIME_PLATFORM: &str = "System.Runtime.Platform";
    pub const SYSTEM_RUNTIME_GET_TRIGGER: &str = "System.Runtime.GetTrigger";
    pub const SYSTEM_RUNTIME_CHECK_WITNESS: &str = "System.Runtime.CheckWitness";
    pub const SYSTEM_RUNTIME_NOTIFY: &str = "System.Runtime.Notify";
    pub const SYSTEM_RUNTIME_LOG: &str = "System.Runtime.Log";
    pub const SYSTEM_RUNTIME_GET_TIME: &str = "System.Runtime.GetTime";

    pub const SYSTEM_ENGINE_GET_SCRIPT_CONTAINER: &str = "System.ExecutionEngine.GetScriptContainer";
    pub const SYSTEM_ENGINE_GET_EXECUTING_SCRIPT_HASH: &str = "System.ExecutionEngine.GetExecutingScriptHash";
    pub const SYSTEM_ENGINE_GET_CALLING_SCRIPT_HASH: &str = "System.ExecutionEngine.GetCallingScriptHash";
    pub const SYSTEM_ENGINE_GET_ENTRY_SCRIPT_HASH: &str = "System.ExecutionEngine.GetEntryScriptHash";

    pub const SYSTEM_BLOCKCHAIN_GET_HEIGHT: &str = "System.Blockchain.GetHeight";
    pub const SYSTEM_BLOCKCHAIN_GET_HEADER: &str = "System.Blockchain.GetHeader";
    pub const SYSTEM_BLOCKCHAIN_GET_BLOCK: &str = "System.Blockchain.GetBlock";
    pub const SYSTEM_BLOCKCHAIN_GET_TRANSACTION: &str = "System.Blockchain.GetTransaction";
    pub const SYSTEM_BLOCKCHAIN_GET_TRANSACTION_HEIGHT: &str = "System.Blockchain.GetTransactionHeight";
    pub const SYSTEM_BLOCKCHAIN_GET_CONTRACT: &str = "System.Blockchain.GetContract";

    pub const SYSTEM_HEADER_GET_INDEX: &str = "System.Header.GetIndex";
    pub const SYSTEM_HEADER_GET_HASH: &str = "System.Header.GetHash";
    pub const SYSTEM_HEADER_GET_PREV_HASH: &str = "System.Header.GetPrevHash";
    pub const SYSTEM_HEADER_GET_TIMESTAMP: &str = "System.Header.GetTimestamp";

    pub const SYSTEM_BLOCK_GET_TRANSACTION_COUNT: &str = "System.Block.GetTransactionCount";
    pub const SYSTEM_BLOCK_GET_TRANSACTIONS: &str = "System.Block.GetTransactions";
    pub const SYSTEM_BLOCK_GET_TRANSACTION: &str = "System.Block.GetTransaction";

    pub const SYSTEM_TRANSACTION_GET_HASH: &str = "System.Transaction.GetHash";

    pub const SYSTEM_CONTRACT_DESTROY: &str = "System.Contract.Destroy";
    pub const SYSTEM_CONTRACT_GET_STORAGE_CONTEXT: &str = "System.Contract.GetStorageContext";

    pub const SYSTEM_STORAGE_GET_CONTEXT: &str = "System.Storage.GetContext";
    pub const SYSTEM_STORAGE_GET_READ_ONLY_CONTEXT: &str = "System.Storage.GetReadOnlyContext";
    pub const SYSTEM_STORAGE_GET: &str = "System.Storage.Get";
    pub const SYSTEM_STORAGE_PUT: &str = "System.Storage.Put";
    pub const SYSTEM_STORAGE_PUT_EX: &str = "System.Storage.PutEx";
    pub const SYSTEM_STORAGE_DELETE: &str = "System.Storage.Delete";
    pub const SYSTEM_STORAGE_CONTEXT_AS_READ_ONLY: &str = "System.StorageContext.AsReadOnly";

    // ===== Neo =====
    pub const NEO_RUNTIME_GET_TRIGGER: &str = "Neo.Runtime.GetTrigger";
    pub const NEO_RUNTIME_CHECK_WITNESS: &str = "Neo.Runtime.CheckWitness";
    pub const NEO_RUNTIME_NOTIFY: &str = "Neo.Runtime.Notify";
    pub const NEO_RUNTIME_LOG: &str = "Neo.Runtime.Log";
    pub const NEO_RUNTIME_GET_TIME: &str = "Neo.Runtime.GetTime";

    pub const NEO_BLOCKCHAIN_GET_HEIGHT: &str = "Neo.Blockchain.GetHeight";
    pub const NEO_BLOCKCHAIN_GET_HEADER: &str = "Neo.Blockchain.GetHeader";
    pub const NEO_BLOCKCHAIN_GET_BLOCK: &str = "Neo.Blockchain.GetBlock";
    pub const NEO_BLOCKCHAIN_GET_TRANSACTION: &str = "Neo.Blockchain.GetTransaction";
    pub const NEO_BLOCKCHAIN_GET_TRANSACTION_HEIGHT: &str = "Neo.Blockchain.GetTransactionHeight";
    pub const NEO_BLOCKCHAIN_GET_ACCOUNT: &str = "Neo.Blockchain.GetAccount";
    pub const NEO_BLOCKCHAIN_GET_ASSET: &str = "Neo.Blockchain.GetAsset";
    pub const NEO_BLOCKCHAIN_GET_CONTRACT: &str = "Neo.Blockchain.GetContract";

    pub const NEO_HEADER_GET_INDEX: &str = "Neo.Header.GetIndex";
    pub const NEO_HEADER_GET_HASH: &str = "Neo.Header.GetHash";
    pub const NEO_HEADER_GET_PREV_HASH: &str = "Neo.Header.GetPrevHash";
    pub const NEO_HEADER_GET_TIMESTAMP: &str = "Neo.Header.GetTimestamp";
    pub const NEO_HEADER_GET_VERSION: &str = "Neo.Header.GetVersion";
    pub const NEO_HEADER_GET_MERKLE_ROOT: &str = "Neo.Header.GetMerkleRoot";
    pub const NEO_HEADER_GET_CONSENSUS_DATA: &str = "Neo.Header.GetConsensusData";
    pub const NEO_HEADER_GET_NEXT_CONSENSUS: &str = "Neo.Header.GetNextConsensus";

    pub const NEO_BLOCK_GET_TRANSACTION_COUNT: &str = "Neo.Block.GetTransactionCount";
    pub const NEO_BLOCK_GET_TRANSACTIONS: &str = "Neo.Block.GetTransactions";
    pub const NEO_BLOCK_GET_TRANSACTION: &str = "Neo.Block.GetTransaction";

    pub const NEO_TRANSACTION_GET_HASH: &str = "Neo.Transaction.GetHash";
    pub const NEO_TRANSACTION_GET_TYPE: &str = "Neo.Transaction.GetType";
    pub const NEO_TRANSACTION_GET_ATTRIBUTES: &str = "Neo.Transaction.GetAttributes";
    pub const NEO_TRANSACTION_GET_INPUTS: &str = "Neo.Transaction.GetInputs";
    pub const NEO_TRANSACTION_GET_OUTPUTS: &str = "Neo.Transaction.GetOutputs";
    pub const NEO_TRANSACTION_GET_WITNESSES: &str = "Neo.Transaction.GetWitnesses";

    pub const NEO_ATTRIBUTE_GET_USAGE: &str = "Neo.Attribute.GetUsage";
    pub const NEO_ATTRIBUTE_GET_DATA: &str = "Neo.Attribute.GetData";
    pub const NEO_INPUT_GET_HASH: &str = "Neo.Input.GetHash";
    pub const NEO_INPUT_GET_INDEX: &str = "Neo.Input.GetIndex";
    pub const NEO_OUTPUT_GET_ASSET_ID: &str = "Neo.Output.GetAssetId";
    pub const NEO_OUTPUT_GET_VALUE: &str = "Neo.Output.GetValue";
    pub const NEO_OUTPUT_GET_SCRIPT_HASH: &str = "Neo.Output.GetScriptHash";
    pub const NEO_WITNESS_GET_VERIFICATION_SCRIPT: &str = "Neo.Witness.GetVerificationScript";

    pub const NEO_ACCOUNT_GET_SCRIPT_HASH: &str = "Neo.Account.GetScriptHash";
    pub const NEO_ACCOUNT_GET_VOTES: &str = "Neo.Account.GetVotes";
    pub const NEO_ACCOUNT_GET_BALANCE: &str = "Neo.Account.GetBalance";
    pub const NEO_ACCOUNT_IS_STANDARD: &str = "Neo.Account.IsStandard";

    pub const NEO_ASSET_CREATE: &str = "Neo.Asset.Create";
    pub const NEO_ASSET_RENEW: &str = "Neo.Asset.Renew";
    pub const NEO_ASSET_GET_ASSET_ID: &str = "Neo.Asset.GetAssetId";
    pub const NEO_ASSET_GET_ASSET_TYPE: &str = "Neo.Asset.GetAssetType";
    pub const NEO_ASSET_GET_AMOUNT: &str = "Neo.Asset.GetAmount";
    pub const NEO_ASSET_GET_AVAILABLE: &str = "Neo.Asset.GetAvailable";
    pub const NEO_ASSET_GET_PRECISION: &str = "Neo.Asset.GetPrecision";
    pub const NEO_ASSET_GET_OWNER: &str = "Neo.Asset.GetOwner";
    pub const NEO_ASSET_GET_ADMIN: &str = "Neo.Asset.GetAdmin";
    pub const NEO_ASSET_GET_ISSUER: &str = "Neo.Asset.GetIssuer";

    pub const NEO_CONTRACT_CREATE: &str = "Neo.Contract.Create";
    pub const NEO_CONTRACT_MIGRATE: &str = "Neo.Contract.Migrate";
    pub const NEO_CONTRACT_DESTROY: &str = "Neo.Contract.Destroy";
    pub const NEO_CONTRACT_GET_SCRIPT: &str = "Neo.Contract.GetScript";
    pub const NEO_CONTRACT_IS_PAYABLE: &str = "Neo.Contract.IsPayable";
    pub const NEO_CONTRACT_GET_STORAGE_CONTEXT: &str = "Neo.Contract.GetStorageContext";

    pub const NEO_STORAGE_GET_CONTEXT: &str = "Neo.Storage.GetContext";
    pub const NEO_STORAGE_GET_READ_ONLY_CONTEXT: &str = "Neo.Storage.GetReadOnlyContext";
    pub const NEO_STORAGE_GET: &str = "Neo.Storage.Get";
    pub const NEO_STORAGE_PUT: &str = "Neo.Storage.Put";
    pub const NEO_STORAGE_DELETE: &str = "Neo.Storage.Delete";
    pub const NEO_STORAGE_FIND: &str = "Neo.Storage.Find";
    pub const NEO_STORAGE_CONTEXT_AS_READ_ONLY: &str = "Neo.StorageContext.AsReadOnly";

    pub const NEO_ENUMERATOR_NEXT: &str = "Neo.Enumerator.Next";
    pub const NEO_ENUMERATOR_VALUE: &str = "Neo.Enumerator.Value";
    pub const NEO_ITERATOR_NEXT: &str = "Neo.Iterator.Next";
    pub const NEO_ITERATOR_KEY: &str = "Neo.Iterator.Key";
    pub const NEO_ITERATOR_VALUE: &str = "Neo.Iterator.Value";
}

use syscall_names::*;

fn register(table: &mut IndexMap<&'static str, SyscallHandler>, names: &[&'static str], handler: SyscallHandler) {
    for name in names {
        table.insert(*name, handler);
    }
}

lazy_static! {
    static ref SYSCALLS: IndexMap<&'static str, SyscallHandler> = {
        let mut t = IndexMap::new();

        // Runtime
        register(&mut t, &[SYSTEM_RUNTIME_PLATFORM], runtime::runtime_platform);
        register(&mut t, &[SYSTEM_RUNTIME_GET_TRIGGER, NEO_RUNTIME_GET_TRIGGER], runtime::runtime_get_trigger);
        register(&mut t, &[SYSTEM_RUNTIME_CHECK_WITNESS, NEO_RUNTIME_CHECK_WITNESS], witness::runtime_check_witness);
        register(&mut t, &[SYSTEM_RUNTIME_NOTIFY, NEO_RUNTIME_NOTIFY], runtime::runtime_notify);
        register(&mut t, &[SYSTEM_RUNTIME_LOG, NEO_RUNTIME_LOG], runtime::runtime_log);
        register(&mut t, &[SYSTEM_RUNTIME_GET_TIME, NEO_RUNTIME_GET_TIME], runtime::runtime_get_time);

        // Execution engine
        register(&mut t, &[SYSTEM_ENGINE_GET_SCRIPT_CONTAINER], runtime::engine_get_script_container);
        register(&mut t, &[SYSTEM_ENGINE_GET_EXECUTING_SCRIPT_HASH], runtime::engine_get_executing_script_hash);
        register(&mut t, &[SYSTEM_ENGINE_GET_CALLING_SCRIPT_HASH], runtime::engine_get_calling_script_hash);
        register(&mut t, &[SYSTEM_ENGINE_GET_ENTRY_SCRIPT_HASH], runtime::engine_get_entry_script_hash);

        // Blockchain
        register(&mut t, &[SYSTEM_BLOCKCHAIN_GET_HEIGHT, NEO_BLOCKCHAIN_GET_HEIGHT], blockchain::bc_get_height);
        register(&mut t, &[SYSTEM_BLOCKCHAIN_GET_HEADER, NEO_BLOCKCHAIN_GET_HEADER], blockchain::bc_get_header);
        register(&mut t, &[SYSTEM_BLOCKCHAIN_GET_BLOCK, NEO_BLOCKCHAIN_GET_BLOCK], blockchain::bc_get_block);
        register(&mut t, &[SYSTEM_BLOCKCHAIN_GET_TRANSACTION, NEO_BLOCKCHAIN_GET_TRANSACTION], blockchain::bc_get_transaction);
        register(
            &mut t,
            &[SYSTEM_BLOCKCHAIN_GET_TRANSACTION_HEIGHT, NEO_BLOCKCHAIN_GET_TRANSACTION_HEIGHT],
            blockchain::bc_get_transaction_height,
        );
        register(&mut t, &[NEO_BLOCKCHAIN_GET_ACCOUNT], blockchain::bc_get_account);
        register(&mut t, &[NEO_BLOCKCHAIN_GET_ASSET], blockchain::bc_get_asset);
        register(&mut t, &[SYSTEM_BLOCKCHAIN_GET_CONTRACT, NEO_BLOCKCHAIN_GET_CONTRACT], blockchain::bc_get_contract);

        // Header
        register(&mut t, &[SYSTEM_HEADER_GET_INDEX, NEO_HEADER_GET_INDEX], blockchain::header_get_index);
        register(&mut t, &[SYSTEM_HEADER_GET_HASH, NEO_HEADER_GET_HASH], blockchain::header_get_hash);
        register(&mut t, &[SYSTEM_HEADER_GET_PREV_HASH, NEO_HEADER_GET_PREV_HASH], blockchain::header_get_prev_hash);
        register(&mut t, &[SYSTEM_HEADER_GET_TIMESTAMP, NEO_HEADER_GET_TIMESTAMP], blockchain::header_get_timestamp);
        register(&mut t, &[NEO_HEADER_GET_VERSION], blockchain::header_get_version);
        register(&mut t, &[NEO_HEADER_GET_MERKLE_ROOT], blockchain::header_get_merkle_root);
        register(&mut t, &[NEO_HEADER_GET_CONSENSUS_DATA], blockchain::header_get_consensus_data);
        register(&mut t, &[NEO_HEADER_GET_NEXT_CONSENSUS], blockchain::header_get_next_consensus);

        // Block
        register(
            &mut t,
            &[SYSTEM_BLOCK_GET_TRANSACTION_COUNT, NEO_BLOCK_GET_TRANSACTION_COUNT],
            blockchain::block_get_transaction_count,
        );
        register(&mut t, &[SYSTEM_BLOCK_GET_TRANSACTIONS, NEO_BLOCK_GET_TRANSACTIONS], blockchain::block_get_transactions);
        register(&mut t, &[SYSTEM_BLOCK_GET_TRANSACTION, NEO_BLOCK_GET_TRANSACTION], blockchain::block_get_transaction);

        // Transaction and its parts
        register(&mut t, &[SYSTEM_TRANSACTION_GET_HASH, NEO_TRANSACTION_GET_HASH], blockchain::tx_get_hash);
        register(&mut t, &[NEO_TRANSACTION_GET_TYPE], blockchain::tx_get_type);
        register(&mut t, &[NEO_TRANSACTION_GET_ATTRIBUTES], blockchain::tx_get_attributes);
        register(&mut t, &[NEO_TRANSACTION_GET_INPUTS], blockchain::tx_get_inputs);
        register(&mut t, &[NEO_TRANSACTION_GET_OUTPUTS], blockchain::tx_get_outputs);
        register(&mut t, &[NEO_TRANSACTION_GET_WITNESSES], blockchain::tx_get_witnesses);
        register(&mut t, &[NEO_ATTRIBUTE_GET_USAGE], blockchain::attribute_get_usage);
        register(&mut t, &[NEO_ATTRIBUTE_GET_DATA], blockchain::attribute_get_data);
        register(&mut t, &[NEO_INPUT_GET_HASH], blockchain::input_get_hash);
        register(&mut t, &[NEO_INPUT_GET_INDEX], blockchain::input_get_index);
        register(&mut t, &[NEO_OUTPUT_GET_ASSET_ID], blockchain::output_get_asset_id);
        register(&mut t, &[NEO_OUTPUT_GET_VALUE], blockchain::output_get_value);
        register(&mut t, &[NEO_OUTPUT_GET_SCRIPT_HASH], blockchain::output_get_script_hash);
        register(&mut t, &[NEO_WITNESS_GET_VERIFICATION_SCRIPT], blockchain::witness_get_verification_script);

        // Account
        register(&mut t, &[NEO_ACCOUNT_GET_SCRIPT_HASH], blockchain::account_get_script_hash);
        register(&mut t, &[NEO_ACCOUNT_GET_VOTES], blockchain::account_get_votes);
        register(&mut t, &[NEO_ACCOUNT_GET_BALANCE], blockchain::account_get_balance);
        register(&mut t, &[NEO_ACCOUNT_IS_STANDARD], blockchain::account_is_standard);

        // Asset
        register(&mut t, &[NEO_ASSET_CREATE], asset::asset_create);
        register(&mut t, &[NEO_ASSET_RENEW], asset::asset_renew);
        register(&mut t, &[NEO_ASSET_GET_ASSET_ID], asset::asset_get_asset_id);
        register(&mut t, &[NEO_ASSET_GET_ASSET_TYPE], asset::asset_get_asset_type);
        register(&mut t, &[NEO_ASSET_GET_AMOUNT], asset::asset_get_amount);
        register(&mut t, &[NEO_ASSET_GET_AVAILABLE], asset::asset_get_available);
        register(&mut t, &[NEO_ASSET_GET_PRECISION], asset::asset_get_precision);
        register(&mut t, &[NEO_ASSET_GET_OWNER], asset::asset_get_owner);
        register(&mut t, &[NEO_ASSET_GET_ADMIN], asset::asset_get_admin);
        register(&mut t, &[NEO_ASSET_GET_ISSUER], asset::asset_get_issuer);

        // Contract
        register(&mut t, &[NEO_CONTRACT_CREATE], contract::contract_create);
        register(&mut t, &[NEO_CONTRACT_MIGRATE], contract::contract_migrate);
        register(&mut t, &[SYSTEM_CONTRACT_DESTROY, NEO_CONTRACT_DESTROY], contract::contract_destroy);
        register(&mut t, &[NEO_CONTRACT_GET_SCRIPT], contract::contract_get_script);
        register(&mut t, &[NEO_CONTRACT_IS_PAYABLE], contract::contract_is_payable);
        register(
            &mut t,
            &[SYSTEM_CONTRACT_GET_STORAGE_CONTEXT, NEO_CONTRACT_GET_STORAGE_CONTEXT],
            contract::contract_get_storage_context,
        );

        // Storage
        register(&mut t, &[SYSTEM_STORAGE_GET_CONTEXT, NEO_STORAGE_GET_CONTEXT], storage::storage_get_context);
        register(
            &mut t,
            &[SYSTEM_STORAGE_GET_READ_ONLY_CONTEXT, NEO_STORAGE_GET_READ_ONLY_CONTEXT],
            storage::storage_get_read_only_context,
        );
        register(
            &mut t,
            &[SYSTEM_STORAGE_CONTEXT_AS_READ_ONLY, NEO_STORAGE_CONTEXT_AS_READ_ONLY],
            storage::storage_context_as_read_only,
        );
        register(&mut t, &[SYSTEM_STORAGE_GET, NEO_STORAGE_GET], storage::storage_get);
        register(&mut t, &[SYSTEM_STORAGE_PUT, NEO_STORAGE_PUT], storage::storage_put);
        register(&mut t, &[SYSTEM_STORAGE_PUT_EX], storage::storage_put_ex);
        register(&mut t, &[SYSTEM_STORAGE_DELETE, NEO_STORAGE_DELETE], storage::storage_delete);
        register(&mut t, &[NEO_STORAGE_FIND], storage::storage_find);

        // Iteration over find results
        register(&mut t, &[NEO_ENUMERATOR_NEXT, NEO_ITERATOR_NEXT], storage::enumerator_next);
        register(&mut t, &[NEO_ITERATOR_KEY], storage::iterator_key);
        register(&mut t, &[NEO_ENUMERATOR_VALUE, NEO_ITERATOR_VALUE], storage::enumerator_value);

        t
    };
}

pub fn get_handler(name: &str) -> Option<SyscallHandler> {
    SYSCALLS.get(name).copied()
}

pub fn is_registered(name: &str) -> bool {
    SYSCALLS.contains_key(name)
}

// Every registered name, in registration order
pub fn registered_syscalls() -> impl Iterator<Item = &'static str> {
    SYSCALLS.keys().copied()
}

/// Run the syscall `name`
///
/// An error means the execution faulted: the caller must stop the script and
/// drop the context so its staged writes are never committed.
pub fn invoke(name: &str, ctx: &mut InteropContext<'_>, engine: &mut Engine) -> Result<(), InteropError> {
    let handler = get_handler(name).ok_or_else(|| InteropError::UnknownSyscall(name.to_owned()))?;

    if log_enabled!(Level::Trace) {
        trace!(
            "syscall {} (stack {}, depth {})",
            name,
            engine.evaluation_stack().len(),
            engine.invocation_depth()
        );
    }

    handler(ctx, engine).map_err(|e| {
        warn!("syscall {} faulted: {}", name, e);
        e
    })
}
