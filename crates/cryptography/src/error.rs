//! Error types for the cryptography crate.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type CryptoResult<T> = std::result::Result<T, CryptoError>;

/// Errors raised while parsing keys or signatures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// The public key bytes are not a valid secp256r1 point.
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    /// The private key bytes are not a valid secp256r1 scalar.
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// The signature is not a 64-byte `r || s` pair.
    #[error("invalid signature: {0}")]
    InvalidSignature(String),
}
