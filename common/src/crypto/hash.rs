use ripemd::Ripemd160;
use serde::de::Error as SerdeError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::{
    convert::TryInto,
    fmt::{Display, Error, Formatter},
    str::FromStr,
};

use super::CryptoError;
use crate::serializer::Serializer;

pub const UINT160_SIZE: usize = 20; // 20 bytes / 160 bits
pub const UINT256_SIZE: usize = 32; // 32 bytes / 256 bits

// Generates a fixed size hash type.
// Bytes are kept in wire order (little-endian); the human readable form and
// the form handed to contracts for 256-bit hashes are the reversed bytes.
macro_rules! define_hash {
    ($name:ident, $size:expr) => {
        #[derive(Eq, PartialEq, PartialOrd, Ord, Clone, Copy, Debug, Hash, Default)]
        pub struct $name([u8; $size]);

        impl $name {
            pub const fn new(bytes: [u8; $size]) -> Self {
                Self(bytes)
            }

            pub const fn zero() -> Self {
                Self([0; $size])
            }

            pub fn as_bytes(&self) -> &[u8; $size] {
                &self.0
            }

            pub fn to_bytes(self) -> [u8; $size] {
                self.0
            }

            // Bytes in reversed (big-endian) order
            pub fn to_reversed_bytes(&self) -> [u8; $size] {
                let mut bytes = self.0;
                bytes.reverse();
                bytes
            }

            pub fn decode_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
                let bytes: [u8; $size] =
                    bytes
                        .try_into()
                        .map_err(|_| CryptoError::InvalidHashLength {
                            len: bytes.len(),
                            expected: $size,
                        })?;
                Ok(Self(bytes))
            }

            pub fn decode_reversed_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
                let mut hash = Self::decode_bytes(bytes)?;
                hash.0.reverse();
                Ok(hash)
            }

            pub fn to_hex(&self) -> String {
                hex::encode(self.to_reversed_bytes())
            }
        }

        impl FromStr for $name {
            type Err = CryptoError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.strip_prefix("0x").unwrap_or(s);
                let bytes = hex::decode(s).map_err(|e| CryptoError::InvalidHex(e.to_string()))?;
                Self::decode_reversed_bytes(&bytes)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
                write!(f, "{}", &self.to_hex())
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'a> Deserialize<'a> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'a>,
            {
                let hex = String::deserialize(deserializer)?;
                if hex.len() != $size * 2 {
                    return Err(SerdeError::custom("Invalid hex length"));
                }
                $name::from_str(&hex).map_err(SerdeError::custom)
            }
        }
    };
}

define_hash!(Uint160, UINT160_SIZE);
define_hash!(Uint256, UINT256_SIZE);

// Single SHA-256 round
pub fn sha256(value: &[u8]) -> [u8; 32] {
    Sha256::digest(value).into()
}

// Double SHA-256, used for block and transaction identifiers
pub fn hash256(value: &[u8]) -> Uint256 {
    Uint256::new(sha256(&sha256(value)))
}

// RIPEMD-160 over SHA-256, used for script hashes
pub fn hash160(value: &[u8]) -> Uint160 {
    let result: [u8; UINT160_SIZE] = Ripemd160::digest(sha256(value)).into();
    Uint160::new(result)
}

// Anything whose identifier is the double SHA-256 of its hashable encoding
pub trait Hashable: Serializer {
    #[inline(always)]
    fn hash(&self) -> Uint256 {
        hash256(&self.to_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash160_of_empty_script() {
        // RIPEMD160(SHA256("")) in wire order
        let expected = hex::decode("b472a266d0bd89c13706a4132ccfb16f7c3b9fcb").unwrap();
        assert_eq!(hash160(&[]).as_bytes().as_slice(), expected.as_slice());
    }

    #[test]
    fn test_reversed_round_trip() {
        let mut bytes = [0u8; 32];
        bytes[0] = 1;
        let hash = Uint256::new(bytes);
        let reversed = hash.to_reversed_bytes();
        assert_eq!(reversed[31], 1);
        assert_eq!(Uint256::decode_reversed_bytes(&reversed).unwrap(), hash);
    }

    #[test]
    fn test_decode_wrong_length() {
        let err = Uint160::decode_bytes(&[0u8; 19]).unwrap_err();
        assert_eq!(err, CryptoError::InvalidHashLength { len: 19, expected: 20 });
    }

    #[test]
    fn test_hex_display_is_reversed() {
        let mut bytes = [0u8; 20];
        bytes[19] = 0xab;
        let hash = Uint160::new(bytes);
        assert!(hash.to_string().starts_with("ab"));
        assert_eq!(Uint160::from_str(&hash.to_string()).unwrap(), hash);
    }
}
