//! ECDSA (Elliptic Curve Digital Signature Algorithm) over secp256r1.
//!
//! Signatures are the 64-byte `r || s` form; messages are hashed with SHA-256
//! before signing and verification. Public keys are accepted as 33-byte
//! compressed points, 65-byte uncompressed points, or the 64-byte raw `x || y`
//! form used by some wallets.

use crate::error::{CryptoError, CryptoResult};
use p256::{
    ecdsa::{signature::Signer, signature::Verifier, Signature, SigningKey, VerifyingKey},
    elliptic_curve::sec1::ToEncodedPoint,
    PublicKey, SecretKey,
};

/// ECDSA implementation for the Neo virtual machine.
pub struct ECDsa;

impl ECDsa {
    /// Verifies a signature against data and a public key.
    ///
    /// Returns `Ok(false)` for a well-formed signature that does not match and
    /// `Err` when the key or signature cannot be parsed.
    pub fn verify_signature(data: &[u8], signature: &[u8], public_key: &[u8]) -> CryptoResult<bool> {
        let sig = Self::parse_signature(signature)?;
        let verifying_key = VerifyingKey::from(Self::parse_public_key(public_key)?);

        Ok(verifying_key.verify(data, &sig).is_ok())
    }

    /// Signs data with the given private key (RFC 6979 deterministic nonce).
    pub fn sign(data: &[u8], private_key: &[u8]) -> CryptoResult<Vec<u8>> {
        let secret_key = SecretKey::from_slice(private_key)
            .map_err(|e| CryptoError::InvalidPrivateKey(e.to_string()))?;
        let signing_key = SigningKey::from(secret_key);

        let signature: Signature = signing_key.sign(data);
        Ok(signature.to_bytes().to_vec())
    }

    /// Derives the compressed (33-byte) public key from a private key.
    pub fn derive_public_key(private_key: &[u8]) -> CryptoResult<Vec<u8>> {
        let secret_key = SecretKey::from_slice(private_key)
            .map_err(|e| CryptoError::InvalidPrivateKey(e.to_string()))?;

        let encoded_point = secret_key.public_key().to_encoded_point(true);
        Ok(encoded_point.as_bytes().to_vec())
    }

    /// Derives the uncompressed (65-byte) public key from a private key.
    pub fn derive_uncompressed_public_key(private_key: &[u8]) -> CryptoResult<Vec<u8>> {
        let secret_key = SecretKey::from_slice(private_key)
            .map_err(|e| CryptoError::InvalidPrivateKey(e.to_string()))?;

        let encoded_point = secret_key.public_key().to_encoded_point(false);
        Ok(encoded_point.as_bytes().to_vec())
    }

    fn parse_signature(signature: &[u8]) -> CryptoResult<Signature> {
        if signature.len() != 64 {
            return Err(CryptoError::InvalidSignature(format!(
                "expected 64 bytes, got {}",
                signature.len()
            )));
        }

        Signature::from_slice(signature).map_err(|e| CryptoError::InvalidSignature(e.to_string()))
    }

    fn parse_public_key(public_key: &[u8]) -> CryptoResult<PublicKey> {
        let parsed = match public_key.len() {
            33 | 65 => PublicKey::from_sec1_bytes(public_key),
            64 => {
                let mut uncompressed = Vec::with_capacity(65);
                uncompressed.push(0x04);
                uncompressed.extend_from_slice(public_key);
                PublicKey::from_sec1_bytes(&uncompressed)
            }
            len => {
                return Err(CryptoError::InvalidPublicKey(format!(
                    "unsupported key length {len}"
                )))
            }
        };

        parsed.map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))
    }
}
