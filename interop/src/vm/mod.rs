mod engine;
mod iterator;
mod stack;
mod stack_item;

pub use engine::{Engine, ExecutionContext};
pub use iterator::StorageIterator;
pub use stack::EvaluationStack;
pub use stack_item::{integer_to_bytes, integer_to_i64_wrapping, StackItem};
