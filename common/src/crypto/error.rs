use thiserror::Error;

/// Errors that can occur while decoding hashes and keys
///
/// Contracts hand arbitrary byte strings to the node, so every decoding path
/// reports a structured error instead of panicking.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Invalid hexadecimal string format
    #[error("Invalid hex string: {0}")]
    InvalidHex(String),

    /// Hash has invalid length
    #[error("Invalid hash length: {len} bytes, expected: {expected} bytes")]
    InvalidHashLength { len: usize, expected: usize },

    /// Public key has a length no SEC1 encoding uses
    #[error("Invalid public key length: {0} bytes")]
    InvalidPublicKeyLength(usize),

    /// Public key bytes do not describe a point on the curve
    #[error("Invalid public key encoding")]
    InvalidPublicKey,
}
