// src/services/verifier.rs
//! Token record verification service.
//!
//! Validates a single token record against a trusted parent public key and
//! returns its decoded envelope.
//!
//! # Caveat
//! The signature is checked against the caller-supplied trusted key. The
//! record's own `parentPublicKey` field is never compared with that key;
//! callers must make sure the two correspond.

use crate::error::{Result, TokenError};
use crate::models::token::{DecodedToken, TokenRecord, TrustMode};
use crate::token::algorithm::SigningAlgorithm;
use crate::token::codec::{Es256kCodec, TokenCodec};
use crate::wallet::key_management::PublicKey;
use log::{debug, warn};
use serde_json::Value;

/// Validates token records with a given envelope codec.
pub struct Verifier<C = Es256kCodec> {
    codec: C,
}

impl Verifier {
    pub fn new() -> Self {
        Verifier { codec: Es256kCodec }
    }
}

impl Default for Verifier {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: TokenCodec> Verifier<C> {
    pub fn with_codec(codec: C) -> Self {
        Verifier { codec }
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Validates one record.
    ///
    /// # Process Flow
    /// 1. Verifies the envelope signature with `parent_public_key`
    /// 2. Decodes the envelope and checks its header `alg` against `algorithm`
    /// 3. Checks the payload carries `subject.publicKey` and `claim`
    /// 4. Matches the record's trust mode
    ///
    /// # Errors
    /// - `InvalidSignature` if the envelope does not verify, whatever the trust mode
    /// - `UnsupportedAlgorithm` if the header names a different algorithm
    /// - `MalformedPayload` if the payload shape is wrong
    /// - `KeyMismatch` if a self-signed record names a different subject key
    /// - `UnsupportedTrustMode` for delegated records
    pub fn validate(
        &self,
        record: &TokenRecord,
        parent_public_key: &PublicKey,
        algorithm: SigningAlgorithm,
    ) -> Result<DecodedToken> {
        debug!("Verifying {} token record for {}", algorithm, record.public_key);
        if !self.codec.verify(&record.token, parent_public_key) {
            warn!("Rejected token record for {}: bad signature", record.public_key);
            return Err(TokenError::InvalidSignature);
        }

        let decoded_token = self.codec.decode(&record.token)?;
        if decoded_token.header.alg != algorithm.header_algorithm() {
            warn!("Rejected token record for {}: header algorithm", record.public_key);
            return Err(TokenError::UnsupportedAlgorithm(format!(
                "{:?}",
                decoded_token.header.alg
            )));
        }

        let subject_public_key = match decoded_token.subject_public_key() {
            Some(Value::String(key)) => key.as_str(),
            Some(_) => {
                return Err(TokenError::MalformedPayload(
                    "subject.publicKey is not a string".to_string(),
                ))
            }
            None => {
                return Err(TokenError::MalformedPayload(
                    "missing subject.publicKey".to_string(),
                ))
            }
        };
        if decoded_token.claim().is_none() {
            return Err(TokenError::MalformedPayload("missing claim".to_string()));
        }

        match record.trust_mode() {
            TrustMode::SelfSigned { public_key } if public_key == subject_public_key => {}
            TrustMode::SelfSigned { public_key } => {
                warn!("Rejected token record for {}: subject key mismatch", public_key);
                return Err(TokenError::KeyMismatch {
                    record: public_key.to_string(),
                    subject: subject_public_key.to_string(),
                });
            }
            TrustMode::Delegated { public_key, .. } => {
                warn!("Rejected token record for {}: delegated keys", public_key);
                return Err(TokenError::UnsupportedTrustMode);
            }
        }

        debug!("Validated token record for {}", record.public_key);
        Ok(decoded_token)
    }
}

/// Validates a record against a hex-encoded trusted key.
///
/// # Arguments
/// * `record` - Token record to check
/// * `parent_public_key` - Trusted key (compressed or uncompressed SEC1 hex)
/// * `algorithm` - `"ES256K"` or the envelope-level `"ES256"`
///
/// # Returns
/// The decoded envelope `{header, payload, signature}` on success.
///
/// # Errors
/// `UnsupportedAlgorithm` and `InvalidKey` for bad arguments, then any error
/// of [`Verifier::validate`].
pub fn validate_token_record(
    record: &TokenRecord,
    parent_public_key: &str,
    algorithm: &str,
) -> Result<DecodedToken> {
    let algorithm = SigningAlgorithm::from_any_name(algorithm)?;
    let parent_public_key = PublicKey::from_hex(parent_public_key)?;
    Verifier::new().validate(record, &parent_public_key, algorithm)
}

/// Parses a raw JSON record, then validates it. Missing record fields are
/// reported before any cryptographic work.
pub fn validate_token_value(
    record: &Value,
    parent_public_key: &str,
    algorithm: &str,
) -> Result<DecodedToken> {
    let record = TokenRecord::from_value(record.clone())?;
    validate_token_record(&record, parent_public_key, algorithm)
}
