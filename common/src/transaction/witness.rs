use serde::{Deserialize, Serialize};

use crate::{
    crypto::{hash160, Uint160},
    serializer::{Serializer, Writer},
};

/// Invocation script (signatures) plus the verification script they satisfy
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Witness {
    #[serde(with = "hex::serde")]
    pub invocation_script: Vec<u8>,
    #[serde(with = "hex::serde")]
    pub verification_script: Vec<u8>,
}

impl Witness {
    pub fn new(invocation_script: Vec<u8>, verification_script: Vec<u8>) -> Self {
        Self {
            invocation_script,
            verification_script,
        }
    }

    // Hash of the account this witness proves ownership of
    pub fn script_hash(&self) -> Uint160 {
        hash160(&self.verification_script)
    }
}

impl Serializer for Witness {
    fn write(&self, writer: &mut Writer) {
        writer.write_var_bytes(&self.invocation_script);
        writer.write_var_bytes(&self.verification_script);
    }
}
