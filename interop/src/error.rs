/// Error types of the interop service
///
/// Every variant is fatal to the execution that raised it: the dispatcher
/// surfaces it as a fault and the staged overlay of that execution is
/// discarded. Ordinary absence (a missing block, transaction, contract or
/// asset) is never reported through this type.
use ledger_common::{
    crypto::{CryptoError, Uint160},
    error::CommonError,
    trigger::TriggerType,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InteropError {
    #[error("Unknown syscall '{0}'")]
    UnknownSyscall(String),

    #[error("Evaluation stack underflow")]
    StackUnderflow,

    /// Requested invocation stack entry does not exist
    #[error("Invocation stack has no entry at depth {depth} (len {len})")]
    InvalidInvocationDepth { depth: usize, len: usize },

    /// Popped value is not of the expected kind
    #[error("Expected {expected} on the evaluation stack, found {found}")]
    WrongHandleType {
        expected: &'static str,
        found: &'static str,
    },

    /// Malformed hash, key or enum encoding
    #[error(transparent)]
    Decode(#[from] CommonError),

    #[error("Bad block index: {0}")]
    InvalidBlockIndex(String),

    #[error("Storage key of {len} bytes exceeds the limit of {max}")]
    KeyTooLarge { len: usize, max: usize },

    #[error("Storage context is read only")]
    ReadOnlyContext,

    #[error("Storage item is constant")]
    ConstViolation,

    /// Owning contract is missing or was deployed without storage
    #[error("Contract {0} has no storage")]
    NoStorageCapability(Uint160),

    #[error("Operation not allowed with trigger {current}")]
    TriggerNotApplication { current: TriggerType },

    #[error("Witness check failed for {0}")]
    WitnessCheckFailed(String),

    #[error("Parameter given is neither a script hash nor a public key")]
    InvalidWitnessParameter,

    #[error("Contract {0} was not created in this execution")]
    NotCreatedThisExecution(Uint160),

    #[error("Contract {field} of {len} exceeds the limit of {max}")]
    FieldTooLarge {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("Invalid asset {field}: {reason}")]
    InvalidAssetField {
        field: &'static str,
        reason: String,
    },

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },

    /// Operation needs the transaction being processed
    #[error("No transaction is attached to this execution")]
    MissingScriptContainer,

    #[error("Index {index} out of range for {len} items")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("{count} items exceed the maximum array size of {max}")]
    TooManyItems { count: usize, max: usize },

    /// Failure reported by the ledger backend
    #[error(transparent)]
    Ledger(#[from] anyhow::Error),
}

impl From<CryptoError> for InteropError {
    fn from(err: CryptoError) -> Self {
        InteropError::Decode(CommonError::Crypto(err))
    }
}

impl InteropError {
    // Short stable name of the error kind, used when reporting faults
    pub fn kind(&self) -> &'static str {
        match self {
            InteropError::UnknownSyscall(_) => "UnknownSyscall",
            InteropError::StackUnderflow => "StackUnderflow",
            InteropError::InvalidInvocationDepth { .. } => "InvalidInvocationDepth",
            InteropError::WrongHandleType { .. } => "WrongHandleType",
            InteropError::Decode(_) => "DecodeError",
            InteropError::InvalidBlockIndex(_) => "InvalidBlockIndex",
            InteropError::KeyTooLarge { .. } => "KeyTooLarge",
            InteropError::ReadOnlyContext => "ReadOnlyContext",
            InteropError::ConstViolation => "ConstViolation",
            InteropError::NoStorageCapability(_) => "NoStorageCapability",
            InteropError::TriggerNotApplication { .. } => "TriggerNotApplication",
            InteropError::WitnessCheckFailed(_) => "WitnessCheckFailed",
            InteropError::InvalidWitnessParameter => "InvalidWitnessParameter",
            InteropError::NotCreatedThisExecution(_) => "NotCreatedThisExecution",
            InteropError::FieldTooLarge { .. } => "FieldTooLarge",
            InteropError::InvalidAssetField { .. } => "InvalidAssetField",
            InteropError::NotFound { .. } => "NotFound",
            InteropError::MissingScriptContainer => "MissingScriptContainer",
            InteropError::IndexOutOfRange { .. } => "IndexOutOfRange",
            InteropError::TooManyItems { .. } => "TooManyItems",
            InteropError::Ledger(_) => "Ledger",
        }
    }
}
