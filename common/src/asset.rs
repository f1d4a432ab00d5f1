use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

use crate::{
    crypto::{PublicKey, Uint160, Uint256},
    error::CommonError,
    fixed8::Fixed8,
};

// Flag set on every asset type whose holders can credit others freely
pub const CREDIT_FLAG: u8 = 0x40;
// Flag set on every asset type whose transfers need the receiver's consent
pub const DUTY_FLAG: u8 = 0x80;

/// Kind of a registered asset, with its wire encoding
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum AssetType {
    GoverningToken = 0x00,
    UtilityToken = 0x01,
    Currency = 0x08,
    Share = DUTY_FLAG | 0x10,
    Invoice = DUTY_FLAG | 0x18,
    Token = CREDIT_FLAG | 0x20,
}

impl AssetType {
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    // Kinds a contract is allowed to register
    pub const fn is_contract_creatable(self) -> bool {
        matches!(
            self,
            AssetType::Currency | AssetType::Share | AssetType::Invoice | AssetType::Token
        )
    }
}

impl TryFrom<u8> for AssetType {
    type Error = CommonError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0x00 => AssetType::GoverningToken,
            0x01 => AssetType::UtilityToken,
            0x08 => AssetType::Currency,
            0x90 => AssetType::Share,
            0x98 => AssetType::Invoice,
            0x60 => AssetType::Token,
            _ => return Err(CommonError::UnknownDiscriminant { kind: "asset type", value }),
        })
    }
}

/// Registered asset
///
/// `amount` of `-1 satoshi` means the supply is unbounded.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AssetState {
    // Hash of the transaction that registered the asset
    pub id: Uint256,
    pub asset_type: AssetType,
    // Raw bytes as registered, not necessarily UTF-8
    #[serde(with = "hex::serde")]
    pub name: Vec<u8>,
    pub amount: Fixed8,
    // Amount already issued
    pub available: Fixed8,
    pub precision: u8,
    pub owner: PublicKey,
    pub admin: Uint160,
    pub issuer: Uint160,
    // Height after which the asset can no longer be used
    pub expiration: u32,
    pub is_frozen: bool,
}

impl AssetState {
    pub fn is_unbounded(&self) -> bool {
        self.amount == -Fixed8::satoshi()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_encodings() {
        assert_eq!(AssetType::Share.to_u8(), 0x90);
        assert_eq!(AssetType::Invoice.to_u8(), 0x98);
        assert_eq!(AssetType::Token.to_u8(), 0x60);
        for value in [0x00u8, 0x01, 0x08, 0x90, 0x98, 0x60] {
            assert_eq!(AssetType::try_from(value).unwrap().to_u8(), value);
        }
        assert!(AssetType::try_from(0x02).is_err());
    }

    #[test]
    fn test_contract_creatable_kinds() {
        assert!(AssetType::Currency.is_contract_creatable());
        assert!(AssetType::Token.is_contract_creatable());
        assert!(!AssetType::GoverningToken.is_contract_creatable());
        assert!(!AssetType::UtilityToken.is_contract_creatable());
    }
}
