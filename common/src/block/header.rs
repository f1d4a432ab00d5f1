use serde::{Deserialize, Serialize};
use std::fmt::{Display, Error as FmtError, Formatter};

use crate::{
    crypto::{Hashable, Uint160, Uint256},
    serializer::{Serializer, Writer},
    transaction::Witness,
};

/// Block header
///
/// The hash covers every field except the witness `script`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct BlockHeader {
    pub version: u32,
    pub prev_hash: Uint256,
    pub merkle_root: Uint256,
    // Seconds since the unix epoch
    pub timestamp: u32,
    pub index: u32,
    pub consensus_data: u64,
    // Multi-signature script hash of the validators of the next block
    pub next_consensus: Uint160,
    pub script: Witness,
}

impl BlockHeader {
    pub fn new(
        version: u32,
        prev_hash: Uint256,
        merkle_root: Uint256,
        timestamp: u32,
        index: u32,
        consensus_data: u64,
        next_consensus: Uint160,
    ) -> Self {
        Self {
            version,
            prev_hash,
            merkle_root,
            timestamp,
            index,
            consensus_data,
            next_consensus,
            script: Witness::default(),
        }
    }
}

impl Serializer for BlockHeader {
    fn write(&self, writer: &mut Writer) {
        writer.write_u32(self.version);
        writer.write_uint256(&self.prev_hash);
        writer.write_uint256(&self.merkle_root);
        writer.write_u32(self.timestamp);
        writer.write_u32(self.index);
        writer.write_u64(self.consensus_data);
        writer.write_uint160(&self.next_consensus);
    }
}

impl Hashable for BlockHeader {}

impl Display for BlockHeader {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(
            f,
            "BlockHeader[index: {}, prev: {}, timestamp: {}, hash: {}]",
            self.index,
            self.prev_hash,
            self.timestamp,
            self.hash()
        )
    }
}
