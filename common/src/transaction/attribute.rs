use serde::{Deserialize, Serialize};

use crate::serializer::{Serializer, Writer};

/// Usage byte of a transaction attribute
///
/// The usage space is sparse and partially open (hash and remark ranges), so
/// it is kept as a raw byte with named well-known values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeUsage(pub u8);

impl AttributeUsage {
    pub const CONTRACT_HASH: Self = Self(0x00);
    pub const ECDH02: Self = Self(0x02);
    pub const ECDH03: Self = Self(0x03);
    pub const SCRIPT: Self = Self(0x20);
    pub const VOTE: Self = Self(0x30);
    pub const DESCRIPTION_URL: Self = Self(0x81);
    pub const DESCRIPTION: Self = Self(0x90);
    pub const HASH1: Self = Self(0xa1);
    pub const REMARK: Self = Self(0xf0);
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub usage: AttributeUsage,
    #[serde(with = "hex::serde")]
    pub data: Vec<u8>,
}

impl Attribute {
    pub fn new(usage: AttributeUsage, data: Vec<u8>) -> Self {
        Self { usage, data }
    }
}

impl Serializer for Attribute {
    fn write(&self, writer: &mut Writer) {
        writer.write_u8(self.usage.0);
        writer.write_var_bytes(&self.data);
    }
}
