// src/models/token.rs
//! Token payload and token record data model.
//!
//! Field names on the wire are fixed (`claim`, `subject.publicKey`,
//! `issuedAt`, `expiresAt`, `token`, `decodedToken`, `publicKey`,
//! `parentPublicKey`, `encrypted`) so records interoperate with other
//! implementations of the same scheme.

use crate::error::{Result, TokenError};
use crate::models::profile::ProfileComponent;
use chrono::{DateTime, Utc};
use jsonwebtoken::Header;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// The key a claim is bound to.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    /// Compressed SEC1 hex
    pub public_key: String,
}

/// Signed body of a profile token.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TokenPayload {
    pub claim: ProfileComponent,
    pub subject: Subject,
    pub issued_at: DateTime<Utc>,
    /// Always `issued_at` plus one calendar year
    pub expires_at: DateTime<Utc>,
}

/// An envelope split into its parts, without any verification.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DecodedToken {
    pub header: Header,
    /// Kept as raw JSON so shape checks run against exactly what was signed.
    pub payload: Value,
    /// Base64url signature segment
    pub signature: String,
}

impl DecodedToken {
    /// `payload.claim`, if present.
    pub fn claim(&self) -> Option<&Value> {
        self.payload.get("claim")
    }

    /// `payload.subject.publicKey`, if present.
    pub fn subject_public_key(&self) -> Option<&Value> {
        self.payload.get("subject").and_then(|s| s.get("publicKey"))
    }
}

/// A signed claim plus its decoded form and key metadata.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TokenRecord {
    pub token: String,
    /// Informational copy of the decoded envelope. Validation never reads
    /// it, so a foreign or unparsable value is read as `None`.
    #[serde(
        default,
        deserialize_with = "lenient_decoded_token",
        skip_serializing_if = "Option::is_none"
    )]
    pub decoded_token: Option<DecodedToken>,
    pub public_key: String,
    pub parent_public_key: String,
    /// No encryption path exists; always `false` for records produced here.
    #[serde(default)]
    pub encrypted: bool,
}

/// How a record's signing key relates to its parent key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrustMode<'a> {
    /// The claim was signed by the parent key itself.
    SelfSigned { public_key: &'a str },
    /// The claim was signed by a key derived from the parent key.
    Delegated {
        public_key: &'a str,
        parent_public_key: &'a str,
    },
}

/// Fields a record must carry, in the order they are checked.
const REQUIRED_RECORD_FIELDS: [&str; 3] = ["token", "publicKey", "parentPublicKey"];

impl TokenRecord {
    /// Parses a raw JSON record.
    ///
    /// `token`, `publicKey` and `parentPublicKey` are checked in that order;
    /// the first one missing (or not a string) produces `MalformedRecord`.
    /// `decodedToken` and `encrypted` may be absent.
    pub fn from_value(value: Value) -> Result<Self> {
        let fields = value
            .as_object()
            .ok_or_else(|| TokenError::MalformedRecord("record is not a JSON object".to_string()))?;
        check_required_fields(fields)?;
        serde_json::from_value(value).map_err(|e| TokenError::MalformedRecord(e.to_string()))
    }

    pub fn trust_mode(&self) -> TrustMode<'_> {
        if self.public_key == self.parent_public_key {
            TrustMode::SelfSigned {
                public_key: &self.public_key,
            }
        } else {
            TrustMode::Delegated {
                public_key: &self.public_key,
                parent_public_key: &self.parent_public_key,
            }
        }
    }
}

fn lenient_decoded_token<'de, D>(deserializer: D) -> std::result::Result<Option<DecodedToken>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn check_required_fields(fields: &Map<String, Value>) -> Result<()> {
    for name in REQUIRED_RECORD_FIELDS {
        match fields.get(name) {
            Some(Value::String(_)) => {}
            Some(_) => {
                return Err(TokenError::MalformedRecord(format!(
                    "field `{}` is not a string",
                    name
                )))
            }
            None => {
                return Err(TokenError::MalformedRecord(format!(
                    "missing field `{}`",
                    name
                )))
            }
        }
    }
    Ok(())
}
