use serde::{Deserialize, Serialize};

use crate::{
    crypto::{Uint160, Uint256},
    fixed8::Fixed8,
    serializer::{Serializer, Writer},
};

/// Reference to an output of a previous transaction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Input {
    pub prev_hash: Uint256,
    pub prev_index: u16,
}

impl Serializer for Input {
    fn write(&self, writer: &mut Writer) {
        writer.write_uint256(&self.prev_hash);
        writer.write_u16(self.prev_index);
    }
}

/// Amount of an asset sent to a script hash
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    pub asset_id: Uint256,
    pub amount: Fixed8,
    pub script_hash: Uint160,
}

impl Serializer for Output {
    fn write(&self, writer: &mut Writer) {
        writer.write_uint256(&self.asset_id);
        writer.write_i64(self.amount.raw());
        writer.write_uint160(&self.script_hash);
    }
}
