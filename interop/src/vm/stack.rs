use num_bigint::BigInt;

use super::stack_item::{integer_to_i64_wrapping, StackItem};
use crate::error::InteropError;

/// Evaluation stack shared by the interpreter and the syscall handlers
#[derive(Clone, Debug, Default)]
pub struct EvaluationStack {
    items: Vec<StackItem>,
}

impl EvaluationStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<T: Into<StackItem>>(&mut self, item: T) {
        self.items.push(item.into());
    }

    pub fn pop(&mut self) -> Result<StackItem, InteropError> {
        self.items.pop().ok_or(InteropError::StackUnderflow)
    }

    // Item `n` positions below the top
    pub fn peek(&self, n: usize) -> Option<&StackItem> {
        self.items.len().checked_sub(n + 1).and_then(|i| self.items.get(i))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn pop_bytes(&mut self) -> Result<Vec<u8>, InteropError> {
        self.pop()?.try_bytes()
    }

    pub fn pop_integer(&mut self) -> Result<BigInt, InteropError> {
        self.pop()?.try_integer()
    }

    pub fn pop_i64(&mut self) -> Result<i64, InteropError> {
        Ok(integer_to_i64_wrapping(&self.pop_integer()?))
    }

    // Low byte of the popped integer
    pub fn pop_u8(&mut self) -> Result<u8, InteropError> {
        Ok(self.pop_i64()? as u8)
    }

    pub fn pop_bool(&mut self) -> Result<bool, InteropError> {
        Ok(self.pop()?.to_bool())
    }
}
