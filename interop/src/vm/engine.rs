use ledger_common::crypto::{hash160, Uint160};

use super::stack::EvaluationStack;
use crate::error::InteropError;

/// One frame of the invocation stack
#[derive(Clone, Debug)]
pub struct ExecutionContext {
    script: Vec<u8>,
    script_hash: Uint160,
}

impl ExecutionContext {
    pub fn new(script: Vec<u8>) -> Self {
        let script_hash = hash160(&script);
        Self { script, script_hash }
    }

    pub fn script(&self) -> &[u8] {
        &self.script
    }

    pub fn script_hash(&self) -> &Uint160 {
        &self.script_hash
    }
}

/// The part of the interpreter state syscall handlers can reach: the
/// evaluation stack and the invocation stack
///
/// Instruction decoding and execution stay with the interpreter; it loads
/// a frame per invoked script and hands this engine to the dispatcher on
/// every syscall instruction.
#[derive(Debug, Default)]
pub struct Engine {
    evaluation_stack: EvaluationStack,
    // Last element is the executing frame
    invocation_stack: Vec<ExecutionContext>,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_script(&mut self, script: Vec<u8>) {
        self.invocation_stack.push(ExecutionContext::new(script));
    }

    pub fn unload_context(&mut self) -> Option<ExecutionContext> {
        self.invocation_stack.pop()
    }

    pub fn evaluation_stack(&self) -> &EvaluationStack {
        &self.evaluation_stack
    }

    pub fn evaluation_stack_mut(&mut self) -> &mut EvaluationStack {
        &mut self.evaluation_stack
    }

    pub fn invocation_depth(&self) -> usize {
        self.invocation_stack.len()
    }

    // Script hash of the frame `n` positions below the top
    pub fn script_hash_at(&self, n: usize) -> Result<Uint160, InteropError> {
        let len = self.invocation_stack.len();
        len.checked_sub(n + 1)
            .and_then(|i| self.invocation_stack.get(i))
            .map(|frame| *frame.script_hash())
            .ok_or(InteropError::InvalidInvocationDepth { depth: n, len })
    }

    pub fn current_script_hash(&self) -> Result<Uint160, InteropError> {
        self.script_hash_at(0)
    }

    pub fn calling_script_hash(&self) -> Result<Uint160, InteropError> {
        self.script_hash_at(1)
    }

    pub fn entry_script_hash(&self) -> Result<Uint160, InteropError> {
        self.invocation_stack
            .first()
            .map(|frame| *frame.script_hash())
            .ok_or(InteropError::InvalidInvocationDepth { depth: 0, len: 0 })
    }
}
