// src/utils/serialization.rs
//! Serialization utilities for token envelopes.
//!
//! Envelope segments are unpadded base64url, as in compact JWS.

use serde::{de::DeserializeOwned, Serialize};

/// Encodes raw bytes as an unpadded base64url segment.
pub fn encode_segment(bytes: &[u8]) -> String {
    base64::encode_config(bytes, base64::URL_SAFE_NO_PAD)
}

/// Decodes an unpadded base64url segment.
pub fn decode_segment(segment: &str) -> Result<Vec<u8>, base64::DecodeError> {
    base64::decode_config(segment, base64::URL_SAFE_NO_PAD)
}

/// Serializes a value to JSON and encodes it as a segment.
pub fn encode_json_segment<T: Serialize>(data: &T) -> Result<String, serde_json::Error> {
    serde_json::to_vec(data).map(|json| encode_segment(&json))
}

/// Decodes a segment and parses its JSON content.
///
/// # Errors
/// Returns a description of the failing stage (base64 or JSON).
pub fn decode_json_segment<T: DeserializeOwned>(segment: &str) -> Result<T, String> {
    let bytes = decode_segment(segment).map_err(|e| format!("Base64 decoding failed: {}", e))?;
    serde_json::from_slice(&bytes).map_err(|e| format!("JSON decoding failed: {}", e))
}
