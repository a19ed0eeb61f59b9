// src/token/codec.rs
//! Signed-claim envelope codec.
//!
//! Envelopes are compact JWS strings:
//! `base64url(header).base64url(payload).base64url(signature)`. The header
//! is `{"typ":"JWT","alg":"ES256"}` and the signature is a 64-byte `r || s`
//! ECDSA signature over secp256k1 with SHA-256 of the signing input.

use crate::error::{Result, TokenError};
use crate::models::token::DecodedToken;
use crate::token::algorithm::SigningAlgorithm;
use crate::utils::serialization::{decode_json_segment, decode_segment, encode_json_segment, encode_segment};
use crate::wallet::key_management::{PrivateKey, PublicKey};
use jsonwebtoken::Header;
use k256::ecdsa::signature::{Signer, Verifier};
use k256::ecdsa::Signature;
use serde_json::Value;

/// Produces, verifies and splits signed envelopes.
pub trait TokenCodec {
    /// Signs `payload` and returns the serialized envelope.
    fn sign(&self, payload: &Value, private_key: &PrivateKey) -> Result<String>;

    /// Checks the envelope signature against `public_key`. Any malformed
    /// input yields `false`.
    fn verify(&self, token: &str, public_key: &PublicKey) -> bool;

    /// Splits an envelope into header, payload and signature. Does not verify.
    fn decode(&self, token: &str) -> Result<DecodedToken>;
}

/// Codec for secp256k1 envelopes labelled `ES256`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Es256kCodec;

/// Splits an envelope into exactly three segments.
fn split_segments(token: &str) -> Option<[&str; 3]> {
    let mut parts = token.split('.');
    let segments = [parts.next()?, parts.next()?, parts.next()?];
    match parts.next() {
        Some(_) => None,
        None => Some(segments),
    }
}

/// Everything before the last `.`.
fn signing_input(token: &str) -> Option<&str> {
    token.rsplit_once('.').map(|(input, _)| input)
}

impl TokenCodec for Es256kCodec {
    fn sign(&self, payload: &Value, private_key: &PrivateKey) -> Result<String> {
        let header = Header::new(SigningAlgorithm::Es256k.header_algorithm());
        let header_segment = encode_json_segment(&header)?;
        let payload_segment = encode_json_segment(payload)?;
        let message = format!("{}.{}", header_segment, payload_segment);

        let signature: Signature = private_key
            .signing_key()
            .try_sign(message.as_bytes())
            .map_err(|e| TokenError::SigningFailure {
                index: 0,
                reason: e.to_string(),
            })?;

        Ok(format!("{}.{}", message, encode_segment(&signature.to_bytes())))
    }

    fn verify(&self, token: &str, public_key: &PublicKey) -> bool {
        let [header_segment, _, signature_segment] = match split_segments(token) {
            Some(segments) => segments,
            None => return false,
        };

        match decode_json_segment::<Header>(header_segment) {
            Ok(header) if header.alg == SigningAlgorithm::Es256k.header_algorithm() => {}
            _ => return false,
        }

        let signature = match decode_segment(signature_segment)
            .ok()
            .and_then(|bytes| Signature::from_slice(&bytes).ok())
        {
            Some(signature) => signature,
            None => return false,
        };

        match signing_input(token) {
            Some(message) => public_key
                .verifying_key()
                .verify(message.as_bytes(), &signature)
                .is_ok(),
            None => false,
        }
    }

    fn decode(&self, token: &str) -> Result<DecodedToken> {
        let [_, payload_segment, signature_segment] = split_segments(token).ok_or_else(|| {
            TokenError::MalformedPayload("token must have three segments".to_string())
        })?;

        let header = jsonwebtoken::decode_header(token)
            .map_err(|e| TokenError::MalformedPayload(format!("bad token header: {}", e)))?;
        let payload: Value = decode_json_segment(payload_segment)
            .map_err(|e| TokenError::MalformedPayload(format!("bad token payload: {}", e)))?;

        Ok(DecodedToken {
            header,
            payload,
            signature: signature_segment.to_string(),
        })
    }
}
