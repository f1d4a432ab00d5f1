// Conversion between ledger objects and the opaque handles contracts see on
// the evaluation stack.

use std::{cell::RefCell, rc::Rc, sync::Arc};

use ledger_common::{
    account::AccountState,
    asset::AssetState,
    block::{Block, BlockHeader},
    contract::ContractState,
    transaction::{Attribute, Input, Output, Transaction, Witness},
};

use crate::{
    error::InteropError,
    storage::StorageContext,
    vm::{EvaluationStack, StackItem, StorageIterator},
};

/// Domain object wrapped into an interpreter value
///
/// Handles only live for the execution that created them. Two handles are
/// equal when they point to the same object, storage contexts compare by
/// value.
#[derive(Clone, Debug)]
pub enum InteropItem {
    Block(Arc<Block>),
    Header(Arc<BlockHeader>),
    Transaction(Arc<Transaction>),
    Attribute(Arc<Attribute>),
    Input(Arc<Input>),
    Output(Arc<Output>),
    Witness(Arc<Witness>),
    Account(Arc<AccountState>),
    Asset(Arc<AssetState>),
    Contract(Arc<ContractState>),
    StorageContext(StorageContext),
    Iterator(Rc<RefCell<StorageIterator>>),
}

impl InteropItem {
    pub fn kind_name(&self) -> &'static str {
        match self {
            InteropItem::Block(_) => Arc::<Block>::KIND,
            InteropItem::Header(_) => Arc::<BlockHeader>::KIND,
            InteropItem::Transaction(_) => Arc::<Transaction>::KIND,
            InteropItem::Attribute(_) => Arc::<Attribute>::KIND,
            InteropItem::Input(_) => Arc::<Input>::KIND,
            InteropItem::Output(_) => Arc::<Output>::KIND,
            InteropItem::Witness(_) => Arc::<Witness>::KIND,
            InteropItem::Account(_) => Arc::<AccountState>::KIND,
            InteropItem::Asset(_) => Arc::<AssetState>::KIND,
            InteropItem::Contract(_) => Arc::<ContractState>::KIND,
            InteropItem::StorageContext(_) => StorageContext::KIND,
            InteropItem::Iterator(_) => Rc::<RefCell<StorageIterator>>::KIND,
        }
    }
}

impl PartialEq for InteropItem {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (InteropItem::Block(a), InteropItem::Block(b)) => Arc::ptr_eq(a, b),
            (InteropItem::Header(a), InteropItem::Header(b)) => Arc::ptr_eq(a, b),
            (InteropItem::Transaction(a), InteropItem::Transaction(b)) => Arc::ptr_eq(a, b),
            (InteropItem::Attribute(a), InteropItem::Attribute(b)) => Arc::ptr_eq(a, b),
            (InteropItem::Input(a), InteropItem::Input(b)) => Arc::ptr_eq(a, b),
            (InteropItem::Output(a), InteropItem::Output(b)) => Arc::ptr_eq(a, b),
            (InteropItem::Witness(a), InteropItem::Witness(b)) => Arc::ptr_eq(a, b),
            (InteropItem::Account(a), InteropItem::Account(b)) => Arc::ptr_eq(a, b),
            (InteropItem::Asset(a), InteropItem::Asset(b)) => Arc::ptr_eq(a, b),
            (InteropItem::Contract(a), InteropItem::Contract(b)) => Arc::ptr_eq(a, b),
            (InteropItem::StorageContext(a), InteropItem::StorageContext(b)) => a == b,
            (InteropItem::Iterator(a), InteropItem::Iterator(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Typed view over one `InteropItem` variant
pub trait InteropObject: Sized {
    // Kind reported in `WrongHandleType` errors
    const KIND: &'static str;

    fn wrap(self) -> InteropItem;

    fn unwrap(item: &InteropItem) -> Option<Self>;
}

macro_rules! interop_object {
    ($t:ty, $variant:ident, $kind:expr) => {
        impl InteropObject for $t {
            const KIND: &'static str = $kind;

            fn wrap(self) -> InteropItem {
                InteropItem::$variant(self)
            }

            fn unwrap(item: &InteropItem) -> Option<Self> {
                match item {
                    InteropItem::$variant(inner) => Some(inner.clone()),
                    _ => None,
                }
            }
        }
    };
}

interop_object!(Arc<Block>, Block, "block");
interop_object!(Arc<BlockHeader>, Header, "header");
interop_object!(Arc<Transaction>, Transaction, "transaction");
interop_object!(Arc<Attribute>, Attribute, "attribute");
interop_object!(Arc<Input>, Input, "input");
interop_object!(Arc<Output>, Output, "output");
interop_object!(Arc<Witness>, Witness, "witness");
interop_object!(Arc<AccountState>, Account, "account");
interop_object!(Arc<AssetState>, Asset, "asset");
interop_object!(Arc<ContractState>, Contract, "contract");
interop_object!(StorageContext, StorageContext, "storage context");
interop_object!(Rc<RefCell<StorageIterator>>, Iterator, "iterator");

pub fn wrap<T: InteropObject>(object: T) -> StackItem {
    StackItem::Interop(object.wrap())
}

// Checked downcast of a stack value
pub fn unwrap<T: InteropObject>(item: &StackItem) -> Result<T, InteropError> {
    let interop = item.try_interop(T::KIND)?;
    T::unwrap(interop).ok_or(InteropError::WrongHandleType {
        expected: T::KIND,
        found: interop.kind_name(),
    })
}

pub fn pop_interop<T: InteropObject>(stack: &mut EvaluationStack) -> Result<T, InteropError> {
    unwrap(&stack.pop()?)
}

// Header accessors also take a block and read its embedded header
pub fn pop_header(stack: &mut EvaluationStack) -> Result<Arc<BlockHeader>, InteropError> {
    let item = stack.pop()?;
    match item.try_interop(Arc::<BlockHeader>::KIND)? {
        InteropItem::Header(header) => Ok(Arc::clone(header)),
        InteropItem::Block(block) => Ok(Arc::clone(block.get_header())),
        other => Err(InteropError::WrongHandleType {
            expected: Arc::<BlockHeader>::KIND,
            found: other.kind_name(),
        }),
    }
}

// Array of handles, bounded by the interpreter's maximum array size
pub fn wrap_array<T, I>(objects: I) -> Result<StackItem, InteropError>
where
    T: InteropObject,
    I: ExactSizeIterator<Item = T>,
{
    let count = objects.len();
    if count > ledger_common::config::MAX_ARRAY_SIZE {
        return Err(InteropError::TooManyItems {
            count,
            max: ledger_common::config::MAX_ARRAY_SIZE,
        });
    }
    Ok(StackItem::Array(objects.map(wrap).collect()))
}
