// src/error.rs
//! Error type shared by signing, validation and profile assembly.
//!
//! Every variant is terminal for the operation that raised it. Nothing in the
//! crate retries or recovers locally; the first failure is returned unchanged.

use thiserror::Error;

/// Failures raised while producing or consuming profile tokens.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The signing algorithm identifier is not one this crate supports.
    #[error("unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Signing the envelope for one component failed.
    #[error("failed to sign profile component {index}: {reason}")]
    SigningFailure { index: usize, reason: String },

    /// A token record is missing one of its required fields.
    #[error("malformed token record: {0}")]
    MalformedRecord(String),

    /// The envelope signature does not verify against the trusted key.
    #[error("token signature is not valid for the trusted public key")]
    InvalidSignature,

    /// The decoded payload lacks `subject.publicKey` or `claim`, or the
    /// envelope itself cannot be decoded.
    #[error("malformed token payload: {0}")]
    MalformedPayload(String),

    /// The record's public key differs from the payload subject key.
    #[error("token public key {record} does not match subject public key {subject}")]
    KeyMismatch { record: String, subject: String },

    /// Tokens signed by a key distinct from the parent key.
    #[error("verification of tokens signed with delegated keychain keys is not supported")]
    UnsupportedTrustMode,

    /// The issuance instant has no representable expiry one year later.
    #[error("no expiry one year after {0}")]
    ExpiryOutOfRange(String),

    /// Key material could not be parsed.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, TokenError>;
