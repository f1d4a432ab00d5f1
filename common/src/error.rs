use thiserror::Error;

use crate::crypto::CryptoError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommonError {
    #[error("Unknown {kind} value: {value:#04x}")]
    UnknownDiscriminant { kind: &'static str, value: u8 },

    #[error(transparent)]
    Crypto(#[from] CryptoError),
}
