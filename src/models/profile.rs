// src/models/profile.rs
//! Profile data model.
//!
//! A profile is a schema-free JSON object (name, accounts, addresses, ...).
//! Any fragment of it can be signed on its own as a claim.

use crate::error::{Result, TokenError};
use serde_json::{Map, Value};

/// The identity document assembled from claims.
pub type Profile = Map<String, Value>;

/// An atomic, independently signed fragment of a profile.
pub type ProfileComponent = Value;

/// Splits a profile into one single-key component per top-level key.
pub fn profile_components(profile: &Profile) -> Vec<ProfileComponent> {
    profile
        .iter()
        .map(|(key, value)| {
            let mut component = Map::new();
            component.insert(key.clone(), value.clone());
            Value::Object(component)
        })
        .collect()
}

/// Merges a claim into the accumulated profile. Keys already present are
/// overwritten.
///
/// # Errors
/// `MalformedPayload` when the claim is not a JSON object.
pub fn merge_claim(profile: &mut Profile, claim: &Value) -> Result<()> {
    let fields = claim
        .as_object()
        .ok_or_else(|| TokenError::MalformedPayload("claim is not a JSON object".to_string()))?;
    for (key, value) in fields {
        profile.insert(key.clone(), value.clone());
    }
    Ok(())
}
