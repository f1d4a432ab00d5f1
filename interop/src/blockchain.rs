// Read only syscalls over the chain: blocks, headers, transactions and
// their parts, accounts. Misses push an empty byte array.

use std::sync::Arc;

use ledger_common::{
    account::AccountState,
    block::{Block, BlockHeader},
    config::{MAX_ARRAY_SIZE, MAX_BLOCK_INDEX_BYTES},
    contract::is_standard_contract,
    crypto::{Hashable, Uint160, Uint256},
    transaction::{Attribute, Input, Output, Transaction, Witness},
};
use num_traits::ToPrimitive;

use crate::{
    bridge::{pop_header, pop_interop, wrap, wrap_array},
    context::InteropContext,
    error::InteropError,
    vm::{Engine, StackItem},
};

impl<'a> InteropContext<'a> {
    /// Hash designated by a block reference
    ///
    /// References of at most 5 bytes are block indexes, anything longer is
    /// a reversed block hash. The split is on the encoded length only.
    /// `None` when the index is above the current height.
    pub fn resolve_block_hash(&self, reference: &StackItem) -> Result<Option<Uint256>, InteropError> {
        let bytes = reference.try_bytes()?;
        if bytes.len() <= MAX_BLOCK_INDEX_BYTES {
            let index = reference.try_integer()?;
            let index = index
                .to_u32()
                .ok_or_else(|| InteropError::InvalidBlockIndex(index.to_string()))?;
            Ok(self.ledger().get_header_hash(index)?)
        } else {
            Ok(Some(Uint256::decode_reversed_bytes(&bytes)?))
        }
    }

    pub fn get_header_by_reference(&self, reference: &StackItem) -> Result<Option<Arc<BlockHeader>>, InteropError> {
        match self.resolve_block_hash(reference)? {
            Some(hash) => Ok(self.ledger().get_header(&hash)?),
            None => Ok(None),
        }
    }

    pub fn get_block_by_reference(&self, reference: &StackItem) -> Result<Option<Arc<Block>>, InteropError> {
        match self.resolve_block_hash(reference)? {
            Some(hash) => Ok(self.ledger().get_block(&hash)?),
            None => Ok(None),
        }
    }
}

fn push_or_empty(engine: &mut Engine, item: Option<StackItem>) {
    engine
        .evaluation_stack_mut()
        .push(item.unwrap_or_else(StackItem::empty));
}

fn pop_transaction_lookup(
    ctx: &InteropContext,
    engine: &mut Engine,
) -> Result<Option<(Arc<Transaction>, u32)>, InteropError> {
    let bytes = engine.evaluation_stack_mut().pop_bytes()?;
    let hash = Uint256::decode_reversed_bytes(&bytes)?;
    Ok(ctx.ledger().get_transaction(&hash)?)
}

pub(crate) fn bc_get_height(ctx: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    let height = ctx.ledger().block_height()?;
    engine.evaluation_stack_mut().push(height);
    Ok(())
}

pub(crate) fn bc_get_header(ctx: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    let reference = engine.evaluation_stack_mut().pop()?;
    let header = ctx.get_header_by_reference(&reference)?;
    push_or_empty(engine, header.map(wrap));
    Ok(())
}

pub(crate) fn bc_get_block(ctx: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    let reference = engine.evaluation_stack_mut().pop()?;
    let block = ctx.get_block_by_reference(&reference)?;
    push_or_empty(engine, block.map(wrap));
    Ok(())
}

pub(crate) fn bc_get_transaction(ctx: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    let found = pop_transaction_lookup(ctx, engine)?;
    push_or_empty(engine, found.map(|(tx, _)| wrap(tx)));
    Ok(())
}

pub(crate) fn bc_get_transaction_height(ctx: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    let found = pop_transaction_lookup(ctx, engine)?;
    push_or_empty(engine, found.map(|(_, height)| StackItem::from(height)));
    Ok(())
}

pub(crate) fn bc_get_account(ctx: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    let bytes = engine.evaluation_stack_mut().pop_bytes()?;
    let hash = Uint160::decode_bytes(&bytes)?;
    let account = ctx.ledger().get_account_state_or_new(&hash)?;
    engine.evaluation_stack_mut().push(wrap(Arc::new(account)));
    Ok(())
}

pub(crate) fn bc_get_asset(ctx: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    let bytes = engine.evaluation_stack_mut().pop_bytes()?;
    let id = Uint256::decode_reversed_bytes(&bytes)?;
    let asset = ctx.get_asset(&id)?;
    push_or_empty(engine, asset.map(|a| wrap(Arc::new(a))));
    Ok(())
}

pub(crate) fn bc_get_contract(ctx: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    let bytes = engine.evaluation_stack_mut().pop_bytes()?;
    let hash = Uint160::decode_bytes(&bytes)?;
    let contract = ctx.get_contract(&hash)?;
    push_or_empty(engine, contract.map(|c| wrap(Arc::new(c))));
    Ok(())
}

// ===== Header =====

fn push_header_field<T, F>(engine: &mut Engine, field: F) -> Result<(), InteropError>
where
    T: Into<StackItem>,
    F: FnOnce(&BlockHeader) -> T,
{
    let stack = engine.evaluation_stack_mut();
    let header = pop_header(stack)?;
    stack.push(field(&header));
    Ok(())
}

pub(crate) fn header_get_index(_: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    push_header_field(engine, |h| h.index)
}

pub(crate) fn header_get_hash(_: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    push_header_field(engine, |h| h.hash().to_reversed_bytes().to_vec())
}

pub(crate) fn header_get_prev_hash(_: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    push_header_field(engine, |h| h.prev_hash.to_reversed_bytes().to_vec())
}

pub(crate) fn header_get_timestamp(_: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    push_header_field(engine, |h| h.timestamp)
}

pub(crate) fn header_get_version(_: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    push_header_field(engine, |h| h.version)
}

pub(crate) fn header_get_merkle_root(_: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    push_header_field(engine, |h| h.merkle_root.to_reversed_bytes().to_vec())
}

pub(crate) fn header_get_consensus_data(_: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    push_header_field(engine, |h| h.consensus_data)
}

pub(crate) fn header_get_next_consensus(_: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    push_header_field(engine, |h| h.next_consensus.to_bytes().to_vec())
}

// ===== Block =====

pub(crate) fn block_get_transaction_count(_: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    let stack = engine.evaluation_stack_mut();
    let block: Arc<Block> = pop_interop(stack)?;
    stack.push(block.get_txs_count());
    Ok(())
}

pub(crate) fn block_get_transactions(_: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    let stack = engine.evaluation_stack_mut();
    let block: Arc<Block> = pop_interop(stack)?;
    let txs = wrap_array(block.get_transactions().iter().cloned())?;
    stack.push(txs);
    Ok(())
}

// Pops the block, then the transaction index
pub(crate) fn block_get_transaction(_: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    let stack = engine.evaluation_stack_mut();
    let block: Arc<Block> = pop_interop(stack)?;
    let index = stack.pop_i64()?;
    let txs = block.get_transactions();
    let tx = usize::try_from(index)
        .ok()
        .and_then(|i| txs.get(i))
        .ok_or(InteropError::IndexOutOfRange { index, len: txs.len() })?;
    stack.push(wrap(Arc::clone(tx)));
    Ok(())
}

// ===== Transaction =====

fn pop_transaction(engine: &mut Engine) -> Result<Arc<Transaction>, InteropError> {
    pop_interop(engine.evaluation_stack_mut())
}

// Wrap each element of a transaction part as its own handle
fn push_parts<T>(engine: &mut Engine, parts: &[T]) -> Result<(), InteropError>
where
    T: Clone,
    Arc<T>: crate::bridge::InteropObject,
{
    let array = wrap_array(parts.iter().map(|p| Arc::new(p.clone())))?;
    engine.evaluation_stack_mut().push(array);
    Ok(())
}

pub(crate) fn tx_get_hash(_: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    let tx = pop_transaction(engine)?;
    engine
        .evaluation_stack_mut()
        .push(tx.hash().to_reversed_bytes().to_vec());
    Ok(())
}

pub(crate) fn tx_get_type(_: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    let tx = pop_transaction(engine)?;
    engine.evaluation_stack_mut().push(tx.tx_type as u8);
    Ok(())
}

pub(crate) fn tx_get_attributes(_: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    let tx = pop_transaction(engine)?;
    push_parts(engine, &tx.attributes)
}

pub(crate) fn tx_get_inputs(_: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    let tx = pop_transaction(engine)?;
    push_parts(engine, &tx.inputs)
}

pub(crate) fn tx_get_outputs(_: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    let tx = pop_transaction(engine)?;
    push_parts(engine, &tx.outputs)
}

pub(crate) fn tx_get_witnesses(_: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    let tx = pop_transaction(engine)?;
    push_parts(engine, &tx.scripts)
}

pub(crate) fn attribute_get_usage(_: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    let stack = engine.evaluation_stack_mut();
    let attribute: Arc<Attribute> = pop_interop(stack)?;
    stack.push(attribute.usage.0);
    Ok(())
}

pub(crate) fn attribute_get_data(_: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    let stack = engine.evaluation_stack_mut();
    let attribute: Arc<Attribute> = pop_interop(stack)?;
    stack.push(attribute.data.clone());
    Ok(())
}

pub(crate) fn input_get_hash(_: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    let stack = engine.evaluation_stack_mut();
    let input: Arc<Input> = pop_interop(stack)?;
    stack.push(input.prev_hash.to_reversed_bytes().to_vec());
    Ok(())
}

pub(crate) fn input_get_index(_: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    let stack = engine.evaluation_stack_mut();
    let input: Arc<Input> = pop_interop(stack)?;
    stack.push(input.prev_index);
    Ok(())
}

pub(crate) fn output_get_asset_id(_: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    let stack = engine.evaluation_stack_mut();
    let output: Arc<Output> = pop_interop(stack)?;
    stack.push(output.asset_id.to_reversed_bytes().to_vec());
    Ok(())
}

pub(crate) fn output_get_value(_: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    let stack = engine.evaluation_stack_mut();
    let output: Arc<Output> = pop_interop(stack)?;
    stack.push(output.amount.raw());
    Ok(())
}

pub(crate) fn output_get_script_hash(_: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    let stack = engine.evaluation_stack_mut();
    let output: Arc<Output> = pop_interop(stack)?;
    stack.push(output.script_hash.to_bytes().to_vec());
    Ok(())
}

// The script is copied, the interpreter never shares the transaction buffer
pub(crate) fn witness_get_verification_script(_: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    let stack = engine.evaluation_stack_mut();
    let witness: Arc<Witness> = pop_interop(stack)?;
    stack.push(witness.verification_script.clone());
    Ok(())
}

// ===== Account =====

pub(crate) fn account_get_script_hash(_: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    let stack = engine.evaluation_stack_mut();
    let account: Arc<AccountState> = pop_interop(stack)?;
    stack.push(account.script_hash.to_bytes().to_vec());
    Ok(())
}

pub(crate) fn account_get_votes(_: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    let stack = engine.evaluation_stack_mut();
    let account: Arc<AccountState> = pop_interop(stack)?;
    if account.votes.len() > MAX_ARRAY_SIZE {
        return Err(InteropError::TooManyItems {
            count: account.votes.len(),
            max: MAX_ARRAY_SIZE,
        });
    }
    let votes = account
        .votes
        .iter()
        .map(|key| StackItem::from(key.to_bytes()))
        .collect::<Vec<_>>();
    stack.push(votes);
    Ok(())
}

// Pops the account, then the reversed asset id
pub(crate) fn account_get_balance(_: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    let stack = engine.evaluation_stack_mut();
    let account: Arc<AccountState> = pop_interop(stack)?;
    let bytes = stack.pop_bytes()?;
    let asset = Uint256::decode_reversed_bytes(&bytes)?;
    stack.push(account.get_balance(&asset).raw());
    Ok(())
}

// Standard when nothing is deployed at the hash or when the deployed script
// is a plain signature or multi-signature script
pub(crate) fn account_is_standard(ctx: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    let bytes = engine.evaluation_stack_mut().pop_bytes()?;
    let hash = Uint160::decode_bytes(&bytes)?;
    let standard = match ctx.get_contract(&hash)? {
        Some(contract) => is_standard_contract(&contract.script),
        None => true,
    };
    engine.evaluation_stack_mut().push(standard);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{events::EventLog, ledger::MemoryLedger};
    use ledger_common::{transaction::TransactionType, trigger::TriggerType};

    fn block_index_item(index: i64) -> StackItem {
        StackItem::from(index)
    }

    fn chain(blocks: u32) -> (MemoryLedger, Vec<Uint256>) {
        let mut ledger = MemoryLedger::new();
        let mut hashes = Vec::new();
        let mut prev = Uint256::zero();
        for index in 0..blocks {
            let header = BlockHeader::new(0, prev, Uint256::zero(), 100 + index, index, 0, Uint160::zero());
            let tx = Transaction::new(TransactionType::Miner, index.to_le_bytes().to_vec());
            prev = ledger.add_block(Block::new(header, vec![Arc::new(tx)])).unwrap();
            hashes.push(prev);
        }
        (ledger, hashes)
    }

    #[test]
    fn test_reference_by_index_or_hash() {
        let (ledger, hashes) = chain(3);
        let mut events = EventLog::new();
        let ctx = InteropContext::new(TriggerType::Application, &ledger, &mut events);

        assert_eq!(ctx.resolve_block_hash(&block_index_item(2)).unwrap(), Some(hashes[2]));
        assert_eq!(ctx.resolve_block_hash(&StackItem::empty()).unwrap(), Some(hashes[0]));
        assert_eq!(ctx.resolve_block_hash(&block_index_item(3)).unwrap(), None);

        let reversed = StackItem::from(hashes[1].to_reversed_bytes().to_vec());
        assert_eq!(ctx.resolve_block_hash(&reversed).unwrap(), Some(hashes[1]));
    }

    #[test]
    fn test_bad_block_references() {
        let (ledger, _) = chain(1);
        let mut events = EventLog::new();
        let ctx = InteropContext::new(TriggerType::Application, &ledger, &mut events);

        assert!(matches!(
            ctx.resolve_block_hash(&block_index_item(-1)),
            Err(InteropError::InvalidBlockIndex(_))
        ));
        assert!(matches!(
            ctx.resolve_block_hash(&block_index_item(u32::MAX as i64 + 1)),
            Err(InteropError::InvalidBlockIndex(_))
        ));
        // six bytes is too long for an index and too short for a hash
        assert!(matches!(
            ctx.resolve_block_hash(&StackItem::from(vec![1u8; 6])),
            Err(InteropError::Decode(_))
        ));
    }
}
