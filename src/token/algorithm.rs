// src/token/algorithm.rs
//! Supported signing schemes.

use crate::error::TokenError;
use std::fmt;
use std::str::FromStr;

/// Closed set of signing schemes accepted by the tokenizer and validator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SigningAlgorithm {
    /// ECDSA over secp256k1 with SHA-256.
    #[default]
    Es256k,
}

impl SigningAlgorithm {
    /// Public-facing identifier.
    pub fn name(&self) -> &'static str {
        match self {
            SigningAlgorithm::Es256k => "ES256K",
        }
    }

    /// Name written into the envelope header's `alg` field.
    pub fn codec_name(&self) -> &'static str {
        match self {
            SigningAlgorithm::Es256k => "ES256",
        }
    }

    /// Header algorithm the envelope is labelled with.
    pub fn header_algorithm(&self) -> jsonwebtoken::Algorithm {
        match self {
            SigningAlgorithm::Es256k => jsonwebtoken::Algorithm::ES256,
        }
    }

    /// Parses the envelope-level name (`"ES256"`).
    pub fn from_codec_name(name: &str) -> Result<Self, TokenError> {
        match name {
            "ES256" => Ok(SigningAlgorithm::Es256k),
            other => Err(TokenError::UnsupportedAlgorithm(other.to_string())),
        }
    }

    /// Accepts either the public or the envelope-level name.
    pub fn from_any_name(name: &str) -> Result<Self, TokenError> {
        name.parse().or_else(|_| Self::from_codec_name(name))
    }
}

impl FromStr for SigningAlgorithm {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ES256K" => Ok(SigningAlgorithm::Es256k),
            other => Err(TokenError::UnsupportedAlgorithm(other.to_string())),
        }
    }
}

impl fmt::Display for SigningAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
