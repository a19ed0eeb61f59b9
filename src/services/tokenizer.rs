// src/services/tokenizer.rs
//! Profile Tokenizer Service
//!
//! Turns profile components into signed token records. Each component
//! becomes one envelope whose payload binds the claim to the signer's public
//! key for one year.

use crate::clock::{expiry_for, Clock, SystemClock};
use crate::error::{Result, TokenError};
use crate::models::profile::{profile_components, Profile, ProfileComponent};
use crate::models::token::{DecodedToken, Subject, TokenPayload, TokenRecord};
use crate::token::algorithm::SigningAlgorithm;
use crate::token::codec::{Es256kCodec, TokenCodec};
use crate::wallet::key_management::PrivateKey;
use log::debug;

/// Signs profile components with a parent key.
///
/// Generic over the envelope codec and the time source so issuance can be
/// made deterministic.
pub struct ProfileTokenizer<C = Es256kCodec, K = SystemClock> {
    codec: C,
    clock: K,
}

impl ProfileTokenizer {
    /// Tokenizer with the secp256k1 codec and the wall clock.
    pub fn new() -> Self {
        ProfileTokenizer {
            codec: Es256kCodec,
            clock: SystemClock,
        }
    }
}

impl Default for ProfileTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clock> ProfileTokenizer<Es256kCodec, K> {
    pub fn with_clock(clock: K) -> Self {
        ProfileTokenizer {
            codec: Es256kCodec,
            clock,
        }
    }
}

impl<C: TokenCodec, K: Clock> ProfileTokenizer<C, K> {
    pub fn with_codec_and_clock(codec: C, clock: K) -> Self {
        ProfileTokenizer { codec, clock }
    }

    /// Signs every component with `parent_private_key`.
    ///
    /// # Arguments
    /// * `components` - Claims to sign, in output order
    /// * `parent_private_key` - Key that signs and is named as subject
    /// * `algorithm` - Signing scheme
    ///
    /// # Returns
    /// One record per component, in input order. Every record carries the
    /// same `issuedAt` (one clock read per call) and
    /// `publicKey == parentPublicKey`.
    ///
    /// # Errors
    /// - `ExpiryOutOfRange` if the clock reads a time with no expiry one year later
    /// - `SigningFailure` naming the first component that could not be signed
    ///
    /// No partial output is returned.
    pub fn sign_components(
        &self,
        components: &[ProfileComponent],
        parent_private_key: &PrivateKey,
        algorithm: SigningAlgorithm,
    ) -> Result<Vec<TokenRecord>> {
        let public_key_hex = parent_private_key.public_key().to_hex();
        let issued_at = self.clock.now();
        let expires_at = expiry_for(issued_at)?;

        debug!(
            "Signing {} profile component(s) with {} for {}",
            components.len(),
            algorithm,
            public_key_hex
        );

        components
            .iter()
            .enumerate()
            .map(|(index, component)| {
                let payload = TokenPayload {
                    claim: component.clone(),
                    subject: Subject {
                        public_key: public_key_hex.clone(),
                    },
                    issued_at,
                    expires_at,
                };
                self.sign_payload(index, &payload, parent_private_key)
                    .map(|(token, decoded_token)| TokenRecord {
                        token,
                        decoded_token: Some(decoded_token),
                        public_key: public_key_hex.clone(),
                        parent_public_key: public_key_hex.clone(),
                        encrypted: false,
                    })
            })
            .collect()
    }

    fn sign_payload(
        &self,
        index: usize,
        payload: &TokenPayload,
        private_key: &PrivateKey,
    ) -> Result<(String, DecodedToken)> {
        let failure = |e: TokenError| TokenError::SigningFailure {
            index,
            reason: match e {
                TokenError::SigningFailure { reason, .. } => reason,
                other => other.to_string(),
            },
        };

        let payload = serde_json::to_value(payload).map_err(|e| failure(e.into()))?;
        let token = self.codec.sign(&payload, private_key).map_err(failure)?;
        let decoded_token = self.codec.decode(&token).map_err(failure)?;
        debug!("Signed profile component {}", index);
        Ok((token, decoded_token))
    }
}

/// Signs profile components with the default codec and the wall clock.
///
/// `algorithm` must be `"ES256K"`; anything else fails with
/// `UnsupportedAlgorithm` before any key is parsed or anything is signed.
pub fn sign_profile_tokens(
    components: &[ProfileComponent],
    parent_private_key: &str,
    algorithm: &str,
) -> Result<Vec<TokenRecord>> {
    let algorithm: SigningAlgorithm = algorithm.parse()?;
    let private_key = PrivateKey::from_hex(parent_private_key)?;
    ProfileTokenizer::new().sign_components(components, &private_key, algorithm)
}

/// Splits `profile` into one component per top-level key and signs them.
pub fn sign_profile(
    profile: &Profile,
    parent_private_key: &str,
    algorithm: &str,
) -> Result<Vec<TokenRecord>> {
    sign_profile_tokens(&profile_components(profile), parent_private_key, algorithm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::wallet::key_management::PublicKey;
    use chrono::{DateTime, Datelike, TimeZone, Utc};
    use serde_json::{json, Value};

    const PRIVATE_KEY_HEX: &str =
        "a5c61c6ca7b3e7e55edee68566aeab22e4da26baa285c7bd10e8d2218aa3b229";

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn components() -> Vec<Value> {
        vec![
            json!({"name": {"formatted": "Ryan Shea"}}),
            json!({"location": {"formatted": "New York"}}),
        ]
    }

    /// Codec whose signing fails on any claim carrying `"poison": true`.
    struct FailingCodec;

    impl TokenCodec for FailingCodec {
        fn sign(&self, payload: &Value, private_key: &PrivateKey) -> Result<String> {
            if payload["claim"]["poison"] == json!(true) {
                return Err(TokenError::InvalidKey("hardware signer unavailable".to_string()));
            }
            Es256kCodec.sign(payload, private_key)
        }

        fn verify(&self, token: &str, public_key: &PublicKey) -> bool {
            Es256kCodec.verify(token, public_key)
        }

        fn decode(&self, token: &str) -> Result<DecodedToken> {
            Es256kCodec.decode(token)
        }
    }

    #[test]
    fn test_records_follow_input_order() {
        init_logging();
        let records = sign_profile_tokens(&components(), PRIVATE_KEY_HEX, "ES256K").unwrap();
        assert_eq!(records.len(), 2);

        let public_key_hex = PrivateKey::from_hex(PRIVATE_KEY_HEX)
            .unwrap()
            .public_key()
            .to_hex();
        for (record, component) in records.iter().zip(components()) {
            assert_eq!(record.public_key, public_key_hex);
            assert_eq!(record.parent_public_key, public_key_hex);
            assert!(!record.encrypted);

            let decoded = record.decoded_token.as_ref().unwrap();
            assert_eq!(decoded.payload["claim"], component);
            assert_eq!(decoded.payload["subject"]["publicKey"], public_key_hex);
        }
    }

    #[test]
    fn test_unsupported_algorithm_signs_nothing() {
        for algorithm in ["ES256", "RS256", "none"] {
            let err = sign_profile_tokens(&components(), PRIVATE_KEY_HEX, algorithm).unwrap_err();
            assert!(matches!(err, TokenError::UnsupportedAlgorithm(_)));
        }
        // Algorithm is rejected before the key is even parsed.
        let err = sign_profile_tokens(&components(), "not-a-key", "HS256").unwrap_err();
        assert!(matches!(err, TokenError::UnsupportedAlgorithm(_)));
    }

    #[test]
    fn test_fixed_clock_sets_shared_timestamps() {
        let issued = Utc.with_ymd_and_hms(2016, 6, 1, 12, 30, 0).unwrap();
        let tokenizer = ProfileTokenizer::with_clock(FixedClock(issued));
        let private_key = PrivateKey::from_hex(PRIVATE_KEY_HEX).unwrap();
        let records = tokenizer
            .sign_components(&components(), &private_key, SigningAlgorithm::Es256k)
            .unwrap();

        for record in &records {
            let payload: TokenPayload =
                serde_json::from_value(record.decoded_token.as_ref().unwrap().payload.clone())
                    .unwrap();
            assert_eq!(payload.issued_at, issued);
            assert_eq!(payload.expires_at.year(), 2017);
            assert_eq!(payload.expires_at.with_year(2016).unwrap(), issued);
        }
    }

    #[test]
    fn test_unrepresentable_expiry_signs_nothing() {
        let tokenizer = ProfileTokenizer::with_clock(FixedClock(DateTime::<Utc>::MAX_UTC));
        let private_key = PrivateKey::from_hex(PRIVATE_KEY_HEX).unwrap();
        let err = tokenizer
            .sign_components(&components(), &private_key, SigningAlgorithm::Es256k)
            .unwrap_err();
        assert!(matches!(err, TokenError::ExpiryOutOfRange(_)));
    }

    #[test]
    fn test_issued_at_is_read_once() {
        let records = sign_profile_tokens(&components(), PRIVATE_KEY_HEX, "ES256K").unwrap();
        let issued: Vec<DateTime<Utc>> = records
            .iter()
            .map(|r| {
                let payload = &r.decoded_token.as_ref().unwrap().payload;
                serde_json::from_value(payload["issuedAt"].clone()).unwrap()
            })
            .collect();
        assert_eq!(issued[0], issued[1]);
    }

    #[test]
    fn test_signing_failure_names_component() {
        let tokenizer = ProfileTokenizer::with_codec_and_clock(FailingCodec, SystemClock);
        let private_key = PrivateKey::from_hex(PRIVATE_KEY_HEX).unwrap();
        let mut batch = components();
        batch.push(json!({"poison": true}));

        let err = tokenizer
            .sign_components(&batch, &private_key, SigningAlgorithm::Es256k)
            .unwrap_err();
        match err {
            TokenError::SigningFailure { index, reason } => {
                assert_eq!(index, 2);
                assert!(reason.contains("hardware signer unavailable"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_sign_profile_splits_by_key() {
        let profile = json!({"name": "Alice", "website": "https://alice.example"})
            .as_object()
            .cloned()
            .unwrap();
        let records = sign_profile(&profile, PRIVATE_KEY_HEX, "ES256K").unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_empty_batch() {
        let records = sign_profile_tokens(&[], PRIVATE_KEY_HEX, "ES256K").unwrap();
        assert!(records.is_empty());
    }
}
