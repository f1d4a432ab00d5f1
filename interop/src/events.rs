use ledger_common::crypto::Uint160;

use crate::vm::StackItem;

/// Record appended by the notify and log syscalls
#[derive(Clone, Debug, PartialEq)]
pub enum EventRecord {
    Notify { script_hash: Uint160, state: StackItem },
    Log { script_hash: Uint160, message: String },
}

impl EventRecord {
    pub fn script_hash(&self) -> &Uint160 {
        match self {
            EventRecord::Notify { script_hash, .. } | EventRecord::Log { script_hash, .. } => script_hash,
        }
    }
}

/// Destination of the events raised during one execution
///
/// Delivery (plugins, RPC subscriptions, application logs) belongs to the
/// embedder.
pub trait EventSink {
    fn emit(&mut self, record: EventRecord);
}

/// Sink keeping every record in memory, in emission order
#[derive(Debug, Default)]
pub struct EventLog {
    records: Vec<EventRecord>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    pub fn take(&mut self) -> Vec<EventRecord> {
        std::mem::take(&mut self.records)
    }
}

impl EventSink for EventLog {
    fn emit(&mut self, record: EventRecord) {
        self.records.push(record);
    }
}
