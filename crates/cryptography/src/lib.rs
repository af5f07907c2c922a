//! # Neo Cryptography
//!
//! Hash functions and secp256r1 signature verification used by the legacy
//! Neo virtual machine.
//!
//! - **Hashing**: SHA-1, SHA-256, RIPEMD-160 and the Neo combinations
//!   Hash160 (`RIPEMD160(SHA256(x))`) and Hash256 (`SHA256(SHA256(x))`)
//! - **ECDSA**: secp256r1 verification over SHA-256 digests, with key
//!   derivation and signing helpers for hosts and tests

pub mod ecdsa;
pub mod error;
pub mod hash;

pub use ecdsa::ECDsa;
pub use error::{CryptoError, CryptoResult};
pub use hash::{hash160, hash256, ripemd160, sha1, sha256};

/// Size of a script hash (UInt160) in bytes.
pub const HASH160_SIZE: usize = 20;

/// Size of a SHA-256 digest (UInt256) in bytes.
pub const HASH256_SIZE: usize = 32;
