use serde::{Deserialize, Serialize};

/// Value stored under a contract storage key
///
/// A constant item can never be overwritten nor deleted once written.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct StorageItem {
    #[serde(with = "hex::serde")]
    pub value: Vec<u8>,
    pub is_const: bool,
}

impl StorageItem {
    pub fn new(value: Vec<u8>, is_const: bool) -> Self {
        Self { value, is_const }
    }
}

/// Full storage key: the owning contract hash followed by the user key
pub fn storage_key(script_hash: &crate::crypto::Uint160, key: &[u8]) -> Vec<u8> {
    let mut full = Vec::with_capacity(crate::crypto::UINT160_SIZE + key.len());
    full.extend_from_slice(script_hash.as_bytes());
    full.extend_from_slice(key);
    full
}
