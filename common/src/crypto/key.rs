use p256::elliptic_curve::sec1::ToEncodedPoint;
use serde::de::Error as SerdeError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

use super::CryptoError;

// Compressed secp256r1 point size in bytes
pub const PUBLIC_KEY_COMPRESSED_SIZE: usize = 33;
// Uncompressed secp256r1 point size in bytes
pub const PUBLIC_KEY_UNCOMPRESSED_SIZE: usize = 65;

// SEC1 encoding of the point at infinity
const INFINITY_ENCODING: u8 = 0x00;

/// secp256r1 public key kept in compressed form
///
/// The point at infinity is representable because it is a valid decoding
/// result; callers that need a usable key must reject it explicitly.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PublicKey([u8; PUBLIC_KEY_COMPRESSED_SIZE]);

impl PublicKey {
    pub const fn infinity() -> Self {
        Self([0; PUBLIC_KEY_COMPRESSED_SIZE])
    }

    // Decode a SEC1 encoded key: infinity (1 byte), compressed or uncompressed
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        match bytes.len() {
            1 if bytes[0] == INFINITY_ENCODING => Ok(Self::infinity()),
            PUBLIC_KEY_COMPRESSED_SIZE | PUBLIC_KEY_UNCOMPRESSED_SIZE => {
                let point = p256::PublicKey::from_sec1_bytes(bytes)
                    .map_err(|_| CryptoError::InvalidPublicKey)?;
                let encoded = point.to_encoded_point(true);
                let mut compressed = [0u8; PUBLIC_KEY_COMPRESSED_SIZE];
                compressed.copy_from_slice(encoded.as_bytes());
                Ok(Self(compressed))
            }
            len => Err(CryptoError::InvalidPublicKeyLength(len)),
        }
    }

    pub fn is_infinity(&self) -> bool {
        self.0[0] == INFINITY_ENCODING
    }

    // Compressed point, only meaningful when the key is not infinity
    pub fn as_compressed(&self) -> &[u8; PUBLIC_KEY_COMPRESSED_SIZE] {
        &self.0
    }

    // Canonical SEC1 encoding
    pub fn to_bytes(&self) -> Vec<u8> {
        if self.is_infinity() {
            vec![INFINITY_ENCODING]
        } else {
            self.0.to_vec()
        }
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }
}

impl Display for PublicKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl Serialize for PublicKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'a> Deserialize<'a> for PublicKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'a>,
    {
        let hex = String::deserialize(deserializer)?;
        let bytes = hex::decode(hex).map_err(SerdeError::custom)?;
        PublicKey::from_bytes(&bytes).map_err(SerdeError::custom)
    }
}
