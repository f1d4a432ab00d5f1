use std::{cell::RefCell, rc::Rc};

use ledger_common::{config::MAX_STORAGE_KEY_LEN, crypto::Uint160, storage::StorageItem};
use log::trace;

use crate::{
    bridge::{pop_interop, wrap},
    context::InteropContext,
    error::InteropError,
    vm::{Engine, StorageIterator},
};

// PutEx flag marking the written item as constant
const STORAGE_FLAG_CONSTANT: i64 = 0x01;

/// Capability scoping storage access to one contract namespace
///
/// A writable context can be turned into a read-only one, never the
/// reverse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StorageContext {
    script_hash: Uint160,
    read_only: bool,
}

impl StorageContext {
    pub fn new(script_hash: Uint160, read_only: bool) -> Self {
        Self { script_hash, read_only }
    }

    pub fn script_hash(&self) -> &Uint160 {
        &self.script_hash
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn as_read_only(self) -> Self {
        Self {
            script_hash: self.script_hash,
            read_only: true,
        }
    }
}

impl<'a> InteropContext<'a> {
    // The owning contract must exist and have been deployed with storage
    fn check_storage_context(&self, sc: &StorageContext) -> Result<(), InteropError> {
        match self.get_contract(sc.script_hash())? {
            Some(contract) if contract.has_storage() => Ok(()),
            _ => Err(InteropError::NoStorageCapability(*sc.script_hash())),
        }
    }

    fn require_storage_write(&self) -> Result<(), InteropError> {
        if self.trigger().can_write_storage() {
            Ok(())
        } else {
            Err(InteropError::TriggerNotApplication { current: self.trigger() })
        }
    }

    // Value under `key`, empty when the key is unknown or deleted
    pub fn storage_get(&self, sc: &StorageContext, key: &[u8]) -> Result<Vec<u8>, InteropError> {
        self.check_storage_context(sc)?;
        Ok(self
            .get_storage_item(sc.script_hash(), key)?
            .map(|item| item.value)
            .unwrap_or_default())
    }

    pub fn storage_put(
        &mut self,
        sc: &StorageContext,
        key: &[u8],
        value: Vec<u8>,
        is_const: bool,
    ) -> Result<(), InteropError> {
        self.require_storage_write()?;
        if key.len() > MAX_STORAGE_KEY_LEN {
            return Err(InteropError::KeyTooLarge {
                len: key.len(),
                max: MAX_STORAGE_KEY_LEN,
            });
        }
        if sc.is_read_only() {
            return Err(InteropError::ReadOnlyContext);
        }
        self.check_storage_context(sc)?;
        if let Some(existing) = self.get_storage_item(sc.script_hash(), key)? {
            if existing.is_const {
                return Err(InteropError::ConstViolation);
            }
        }

        self.staged_mut()
            .put_storage(sc.script_hash(), key, StorageItem::new(value, is_const));
        Ok(())
    }

    pub fn storage_delete(&mut self, sc: &StorageContext, key: &[u8]) -> Result<(), InteropError> {
        self.require_storage_write()?;
        if sc.is_read_only() {
            return Err(InteropError::ReadOnlyContext);
        }
        self.check_storage_context(sc)?;
        if let Some(existing) = self.get_storage_item(sc.script_hash(), key)? {
            if existing.is_const {
                return Err(InteropError::ConstViolation);
            }
        }

        self.staged_mut().delete_storage(sc.script_hash(), key);
        Ok(())
    }

    /// Committed items whose key starts with `prefix`, in ascending key order
    ///
    /// Unlike `storage_get` this does not look at the staged overlay: writes
    /// made earlier in the same execution are not returned.
    pub fn storage_find(&self, sc: &StorageContext, prefix: &[u8]) -> Result<StorageIterator, InteropError> {
        self.check_storage_context(sc)?;
        let mut entries: Vec<(Vec<u8>, Vec<u8>)> = self
            .ledger()
            .get_storage_items_with_prefix(sc.script_hash(), prefix)?
            .into_iter()
            .map(|(key, item)| (key, item.value))
            .collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        trace!("storage find in {}: {} entries", sc.script_hash(), entries.len());
        Ok(StorageIterator::new(entries))
    }
}

pub(crate) fn storage_get_context(_: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    let hash = engine.current_script_hash()?;
    engine.evaluation_stack_mut().push(wrap(StorageContext::new(hash, false)));
    Ok(())
}

pub(crate) fn storage_get_read_only_context(_: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    let hash = engine.current_script_hash()?;
    engine.evaluation_stack_mut().push(wrap(StorageContext::new(hash, true)));
    Ok(())
}

pub(crate) fn storage_context_as_read_only(_: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    let stack = engine.evaluation_stack_mut();
    let sc: StorageContext = pop_interop(stack)?;
    stack.push(wrap(sc.as_read_only()));
    Ok(())
}

pub(crate) fn storage_get(ctx: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    let stack = engine.evaluation_stack_mut();
    let sc: StorageContext = pop_interop(stack)?;
    let key = stack.pop_bytes()?;
    let value = ctx.storage_get(&sc, &key)?;
    stack.push(value);
    Ok(())
}

fn put_from_stack(ctx: &mut InteropContext, engine: &mut Engine, with_flags: bool) -> Result<(), InteropError> {
    let stack = engine.evaluation_stack_mut();
    let sc: StorageContext = pop_interop(stack)?;
    let key = stack.pop_bytes()?;
    let value = stack.pop_bytes()?;
    let is_const = with_flags && stack.pop_i64()? == STORAGE_FLAG_CONSTANT;
    ctx.storage_put(&sc, &key, value, is_const)
}

pub(crate) fn storage_put(ctx: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    put_from_stack(ctx, engine, false)
}

pub(crate) fn storage_put_ex(ctx: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    put_from_stack(ctx, engine, true)
}

pub(crate) fn storage_delete(ctx: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    let stack = engine.evaluation_stack_mut();
    let sc: StorageContext = pop_interop(stack)?;
    let key = stack.pop_bytes()?;
    ctx.storage_delete(&sc, &key)
}

pub(crate) fn storage_find(ctx: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    let stack = engine.evaluation_stack_mut();
    let sc: StorageContext = pop_interop(stack)?;
    let prefix = stack.pop_bytes()?;
    let iterator = ctx.storage_find(&sc, &prefix)?;
    stack.push(wrap(Rc::new(RefCell::new(iterator))));
    Ok(())
}

pub(crate) fn enumerator_next(_: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    let stack = engine.evaluation_stack_mut();
    let iterator: Rc<RefCell<StorageIterator>> = pop_interop(stack)?;
    let more = iterator.borrow_mut().advance();
    stack.push(more);
    Ok(())
}

pub(crate) fn iterator_key(_: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    let stack = engine.evaluation_stack_mut();
    let iterator: Rc<RefCell<StorageIterator>> = pop_interop(stack)?;
    let iterator = iterator.borrow();
    let key = iterator.key().ok_or(InteropError::IndexOutOfRange {
        index: iterator.position(),
        len: iterator.len(),
    })?;
    stack.push(key);
    Ok(())
}

pub(crate) fn enumerator_value(_: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    let stack = engine.evaluation_stack_mut();
    let iterator: Rc<RefCell<StorageIterator>> = pop_interop(stack)?;
    let iterator = iterator.borrow();
    let value = iterator.value().ok_or(InteropError::IndexOutOfRange {
        index: iterator.position(),
        len: iterator.len(),
    })?;
    stack.push(value);
    Ok(())
}
