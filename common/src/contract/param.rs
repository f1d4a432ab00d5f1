use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt::{self, Display, Formatter};

use crate::error::CommonError;

/// Type of a contract parameter or return value
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "PascalCase")]
#[repr(u8)]
pub enum ParamType {
    Signature = 0x00,
    Boolean = 0x01,
    Integer = 0x02,
    Hash160 = 0x03,
    Hash256 = 0x04,
    ByteArray = 0x05,
    PublicKey = 0x06,
    String = 0x07,
    Array = 0x10,
    InteropInterface = 0xf0,
    Void = 0xff,
}

impl TryFrom<u8> for ParamType {
    type Error = CommonError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0x00 => ParamType::Signature,
            0x01 => ParamType::Boolean,
            0x02 => ParamType::Integer,
            0x03 => ParamType::Hash160,
            0x04 => ParamType::Hash256,
            0x05 => ParamType::ByteArray,
            0x06 => ParamType::PublicKey,
            0x07 => ParamType::String,
            0x10 => ParamType::Array,
            0xf0 => ParamType::InteropInterface,
            0xff => ParamType::Void,
            _ => return Err(CommonError::UnknownDiscriminant { kind: "parameter type", value }),
        })
    }
}

impl Display for ParamType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_and_unknown_values() {
        assert_eq!(ParamType::try_from(0x07).unwrap(), ParamType::String);
        assert_eq!(ParamType::try_from(0xff).unwrap(), ParamType::Void);
        assert_eq!(
            ParamType::try_from(0x08),
            Err(CommonError::UnknownDiscriminant { kind: "parameter type", value: 0x08 })
        );
    }
}
