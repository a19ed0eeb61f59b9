// src/wallet/key_management.rs
//! Key representations for profile token signing.
//!
//! Keys live on the secp256k1 curve (via the `k256` crate) and are exchanged
//! in a canonical hex form:
//! - private keys: 32 bytes hex, optionally followed by the `01` compression marker
//! - public keys: compressed SEC1 point hex (33 bytes)
//!
//! PEM accessors are provided for interop with tooling that expects them.

use crate::error::{Result, TokenError};
use k256::ecdsa::{SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::pkcs8::{DecodePublicKey, EncodePublicKey, LineEnding};
use std::fmt;
use std::str::FromStr;

/// Length in bytes of a raw secp256k1 scalar.
const PRIVATE_KEY_LEN: usize = 32;
/// Trailing byte some wallets append to flag a compressed public key.
const COMPRESSION_MARKER: u8 = 0x01;

/// A secp256k1 signing key.
#[derive(Clone)]
pub struct PrivateKey {
    secret_key: k256::SecretKey,
}

impl PrivateKey {
    /// Generates a fresh key from the thread-local CSPRNG.
    pub fn generate() -> Self {
        let secret_key = k256::SecretKey::random(&mut rand::thread_rng());
        PrivateKey { secret_key }
    }

    /// Builds a key from its raw scalar bytes.
    ///
    /// # Arguments
    /// * `bytes` - 32 raw bytes, or 33 with the trailing `0x01` compression marker
    ///
    /// # Errors
    /// `InvalidKey` if the length is wrong or the scalar is zero / out of range.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let scalar = match bytes.len() {
            PRIVATE_KEY_LEN => bytes,
            n if n == PRIVATE_KEY_LEN + 1 && bytes[PRIVATE_KEY_LEN] == COMPRESSION_MARKER => {
                &bytes[..PRIVATE_KEY_LEN]
            }
            n => {
                return Err(TokenError::InvalidKey(format!(
                    "private key must be {} bytes, got {}",
                    PRIVATE_KEY_LEN, n
                )))
            }
        };
        let secret_key = k256::SecretKey::from_slice(scalar)
            .map_err(|e| TokenError::InvalidKey(format!("bad private key scalar: {}", e)))?;
        Ok(PrivateKey { secret_key })
    }

    /// Parses the canonical hex encoding.
    ///
    /// # Arguments
    /// * `encoded` - 64 hex chars, or 66 ending in the `01` compression marker
    ///
    /// # Returns
    /// The private key; its public key is derived on demand.
    ///
    /// # Errors
    /// `InvalidKey` if the input is not hex or not a valid secp256k1 scalar.
    pub fn from_hex(encoded: &str) -> Result<Self> {
        let bytes = hex::decode(encoded.trim())
            .map_err(|e| TokenError::InvalidKey(format!("private key is not hex: {}", e)))?;
        Self::from_bytes(&bytes)
    }

    /// Parses a SEC1 `EC PRIVATE KEY` PEM document.
    pub fn from_pem(pem: &str) -> Result<Self> {
        let secret_key = k256::SecretKey::from_sec1_pem(pem)
            .map_err(|e| TokenError::InvalidKey(format!("bad private key PEM: {}", e)))?;
        Ok(PrivateKey { secret_key })
    }

    /// Raw 32-byte scalar as lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.secret_key.to_bytes())
    }

    /// SEC1 PEM encoding.
    pub fn to_pem(&self) -> Result<String> {
        let pem = self
            .secret_key
            .to_sec1_pem(LineEnding::LF)
            .map_err(|e| TokenError::InvalidKey(format!("cannot encode private key PEM: {}", e)))?;
        Ok(pem.to_string())
    }

    /// Derives the matching public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            public_key: self.secret_key.public_key(),
        }
    }

    pub(crate) fn signing_key(&self) -> SigningKey {
        SigningKey::from(&self.secret_key)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("public_key", &self.public_key().to_hex())
            .finish_non_exhaustive()
    }
}

impl FromStr for PrivateKey {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

/// A secp256k1 verification key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PublicKey {
    public_key: k256::PublicKey,
}

impl PublicKey {
    /// Parses a SEC1 point, compressed (33 bytes) or uncompressed (65 bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let public_key = k256::PublicKey::from_sec1_bytes(bytes)
            .map_err(|e| TokenError::InvalidKey(format!("bad public key point: {}", e)))?;
        Ok(PublicKey { public_key })
    }

    pub fn from_hex(encoded: &str) -> Result<Self> {
        let bytes = hex::decode(encoded.trim())
            .map_err(|e| TokenError::InvalidKey(format!("public key is not hex: {}", e)))?;
        Self::from_bytes(&bytes)
    }

    /// Parses an SPKI `PUBLIC KEY` PEM document.
    pub fn from_pem(pem: &str) -> Result<Self> {
        let public_key = k256::PublicKey::from_public_key_pem(pem)
            .map_err(|e| TokenError::InvalidKey(format!("bad public key PEM: {}", e)))?;
        Ok(PublicKey { public_key })
    }

    /// Compressed SEC1 point as lowercase hex. This is the form written into
    /// token records and payload subjects.
    pub fn to_hex(&self) -> String {
        hex::encode(self.public_key.to_encoded_point(true).as_bytes())
    }

    pub fn to_pem(&self) -> Result<String> {
        self.public_key
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| TokenError::InvalidKey(format!("cannot encode public key PEM: {}", e)))
    }

    pub(crate) fn verifying_key(&self) -> VerifyingKey {
        VerifyingKey::from(&self.public_key)
    }
}

impl FromStr for PublicKey {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

/// A private key together with its derived public key.
#[derive(Clone, Debug)]
pub struct KeyPair {
    private_key: PrivateKey,
    /// Derived once from `private_key`
    pub public_key: PublicKey,
}

impl KeyPair {
    pub fn generate() -> Self {
        Self::from_private_key(PrivateKey::generate())
    }

    pub fn from_private_key(private_key: PrivateKey) -> Self {
        let public_key = private_key.public_key();
        KeyPair {
            private_key,
            public_key,
        }
    }

    pub fn from_private_hex(encoded: &str) -> Result<Self> {
        PrivateKey::from_hex(encoded).map(Self::from_private_key)
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }
}
