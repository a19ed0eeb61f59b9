// src/settings.rs
//! Runtime settings.
//!
//! ## Environment Variables
//! - `PROFILE_TOKENS_SIGNING_ALGORITHM`: (Optional) signing scheme (default: `ES256K`)
//! - `PROFILE_TOKENS_PRIVATE_KEY`: (Optional) hex private key used to sign profiles
//! - `PROFILE_TOKENS_TRUSTED_PUBLIC_KEY`: (Optional) hex public key records are validated against
//!
//! A `.env` file in the working directory is loaded first when present.

use crate::error::{Result, TokenError};
use crate::token::algorithm::SigningAlgorithm;
use crate::wallet::key_management::{PrivateKey, PublicKey};
use config::{Config, Environment, Source};
use dotenv::dotenv;
use serde::Deserialize;

const ENV_PREFIX: &str = "PROFILE_TOKENS";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub signing_algorithm: String,
    pub private_key: Option<String>,
    pub trusted_public_key: Option<String>,
}

impl Settings {
    /// Loads settings from `.env` and `PROFILE_TOKENS_*` variables.
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::load(Environment::with_prefix(ENV_PREFIX))
    }

    /// Loads settings from an arbitrary source layered over the defaults.
    pub fn load<S>(source: S) -> Result<Self>
    where
        S: Source + Send + Sync + 'static,
    {
        let settings = Config::builder()
            .set_default("signing_algorithm", SigningAlgorithm::default().name())?
            .add_source(source)
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    pub fn algorithm(&self) -> Result<SigningAlgorithm> {
        self.signing_algorithm.parse()
    }

    pub fn private_key(&self) -> Result<PrivateKey> {
        self.private_key
            .as_deref()
            .ok_or_else(|| TokenError::InvalidKey("no private key configured".to_string()))
            .and_then(PrivateKey::from_hex)
    }

    pub fn trusted_public_key(&self) -> Result<PublicKey> {
        self.trusted_public_key
            .as_deref()
            .ok_or_else(|| TokenError::InvalidKey("no trusted public key configured".to_string()))
            .and_then(PublicKey::from_hex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};

    const PRIVATE_KEY_HEX: &str =
        "a5c61c6ca7b3e7e55edee68566aeab22e4da26baa285c7bd10e8d2218aa3b229";

    #[test]
    fn test_defaults() {
        let settings = Settings::load(File::from_str("", FileFormat::Toml)).unwrap();
        assert_eq!(settings.algorithm().unwrap(), SigningAlgorithm::Es256k);
        assert!(settings.private_key.is_none());
        assert!(matches!(settings.private_key(), Err(TokenError::InvalidKey(_))));
        assert!(matches!(settings.trusted_public_key(), Err(TokenError::InvalidKey(_))));
    }

    #[test]
    fn test_keys_from_source() {
        let public_key_hex = PrivateKey::from_hex(PRIVATE_KEY_HEX)
            .unwrap()
            .public_key()
            .to_hex();
        let toml = format!(
            "private_key = \"{}\"\ntrusted_public_key = \"{}\"\n",
            PRIVATE_KEY_HEX, public_key_hex
        );
        let settings = Settings::load(File::from_str(&toml, FileFormat::Toml)).unwrap();

        assert_eq!(settings.private_key().unwrap().to_hex(), PRIVATE_KEY_HEX);
        assert_eq!(settings.trusted_public_key().unwrap().to_hex(), public_key_hex);
    }

    #[test]
    fn test_unsupported_configured_algorithm() {
        let settings =
            Settings::load(File::from_str("signing_algorithm = \"RS256\"", FileFormat::Toml)).unwrap();
        assert!(matches!(settings.algorithm(), Err(TokenError::UnsupportedAlgorithm(_))));
    }
}
