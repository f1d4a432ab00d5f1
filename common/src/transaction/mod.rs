use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

use crate::{
    crypto::Hashable,
    error::CommonError,
    serializer::{Serializer, Writer},
};

mod attribute;
mod coin;
mod witness;

pub use attribute::{Attribute, AttributeUsage};
pub use coin::{Input, Output};
pub use witness::Witness;

// this enum represent all types of transaction a block can carry
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum TransactionType {
    Miner = 0x00,
    Issue = 0x01,
    Claim = 0x02,
    Enrollment = 0x20,
    Register = 0x40,
    Contract = 0x80,
    State = 0x90,
    Publish = 0xd0,
    Invocation = 0xd1,
}

impl TryFrom<u8> for TransactionType {
    type Error = CommonError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0x00 => TransactionType::Miner,
            0x01 => TransactionType::Issue,
            0x02 => TransactionType::Claim,
            0x20 => TransactionType::Enrollment,
            0x40 => TransactionType::Register,
            0x80 => TransactionType::Contract,
            0x90 => TransactionType::State,
            0xd0 => TransactionType::Publish,
            0xd1 => TransactionType::Invocation,
            _ => {
                return Err(CommonError::UnknownDiscriminant {
                    kind: "transaction type",
                    value,
                })
            }
        })
    }
}

/// Ledger transaction as seen by contracts
///
/// `exclusive_data` is the already encoded type specific payload (for example
/// the script of an invocation transaction); the interop layer never looks
/// inside it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub tx_type: TransactionType,
    pub version: u8,
    #[serde(with = "hex::serde")]
    pub exclusive_data: Vec<u8>,
    pub attributes: Vec<Attribute>,
    pub inputs: Vec<Input>,
    pub outputs: Vec<Output>,
    pub scripts: Vec<Witness>,
}

impl Transaction {
    pub fn new(tx_type: TransactionType, exclusive_data: Vec<u8>) -> Self {
        Self {
            tx_type,
            version: 0,
            exclusive_data,
            attributes: Vec::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            scripts: Vec::new(),
        }
    }
}

// Hashable encoding: everything but the witnesses
impl Serializer for Transaction {
    fn write(&self, writer: &mut Writer) {
        writer.write_u8(self.tx_type as u8);
        writer.write_u8(self.version);
        writer.write_bytes(&self.exclusive_data);
        self.attributes.write(writer);
        self.inputs.write(writer);
        self.outputs.write(writer);
    }
}

impl Hashable for Transaction {}
