mod param;
pub mod script;

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

use crate::crypto::{hash160, Uint160};

pub use param::ParamType;
pub use script::{create_signature_redeem_script, is_standard_contract};

/// Property flags of a deployed contract
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ContractProperties(u8);

impl ContractProperties {
    pub const NONE: Self = Self(0);
    pub const HAS_STORAGE: Self = Self(1 << 0);
    pub const HAS_DYNAMIC_INVOKE: Self = Self(1 << 1);
    pub const IS_PAYABLE: Self = Self(1 << 2);

    // Unknown bits are kept as-is, they carry no meaning here
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(&self) -> u8 {
        self.0
    }

    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for ContractProperties {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Deployed contract, identified by the hash160 of its script
///
/// Metadata is kept as the raw bytes the contract supplied, nothing requires
/// it to be valid UTF-8.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ContractState {
    #[serde(with = "hex::serde")]
    pub script: Vec<u8>,
    pub param_list: Vec<ParamType>,
    pub return_type: ParamType,
    pub properties: ContractProperties,
    #[serde(with = "hex::serde")]
    pub name: Vec<u8>,
    #[serde(with = "hex::serde")]
    pub code_version: Vec<u8>,
    #[serde(with = "hex::serde")]
    pub author: Vec<u8>,
    #[serde(with = "hex::serde")]
    pub email: Vec<u8>,
    #[serde(with = "hex::serde")]
    pub description: Vec<u8>,
}

impl ContractState {
    pub fn script_hash(&self) -> Uint160 {
        hash160(&self.script)
    }

    pub fn has_storage(&self) -> bool {
        self.properties.contains(ContractProperties::HAS_STORAGE)
    }

    pub fn has_dynamic_invoke(&self) -> bool {
        self.properties.contains(ContractProperties::HAS_DYNAMIC_INVOKE)
    }

    pub fn is_payable(&self) -> bool {
        self.properties.contains(ContractProperties::IS_PAYABLE)
    }
}

impl Display for ContractState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Contract[hash: {}, name: {}, version: {}, properties: {:#04x}]",
            self.script_hash(),
            String::from_utf8_lossy(&self.name),
            String::from_utf8_lossy(&self.code_version),
            self.properties.bits()
        )
    }
}
