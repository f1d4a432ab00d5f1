#![allow(clippy::new_without_default)]

pub mod asset;
pub mod blockchain;
pub mod bridge;
pub mod context;
pub mod contract;
pub mod dispatcher;
pub mod error;
pub mod events;
pub mod ledger;
pub mod runtime;
pub mod staged;
pub mod storage;
pub mod vm;
pub mod witness;

pub use context::{InteropContext, ScriptContainer};
pub use dispatcher::{invoke, syscall_names, SyscallHandler};
pub use error::InteropError;
pub use events::{EventLog, EventRecord, EventSink};
pub use ledger::{Ledger, LedgerWriter, MemoryLedger};
pub use staged::StagedStore;
pub use storage::StorageContext;
