// src/lib.rs

//! # Profile Tokens
//!
//! Splits an identity profile into independently signed claims ("tokens"),
//! each bound to a secp256k1 public key, and rebuilds the profile from those
//! tokens against a trusted root public key.
//!
//! ## Architecture Overview
//! 1. **Models**: profile, token payload and token record shapes
//! 2. **Wallet**: key parsing, derivation and encoding
//! 3. **Token**: supported algorithms and the signed envelope codec
//! 4. **Services**: tokenizer, verifier and profile assembler
//!
//! ## Example
//! ```
//! use profile_tokens::{get_profile_from_tokens, sign_profile_tokens, PrivateKey};
//! use serde_json::json;
//!
//! let private_key = "a5c61c6ca7b3e7e55edee68566aeab22e4da26baa285c7bd10e8d2218aa3b229";
//! let public_key = PrivateKey::from_hex(private_key)?.public_key().to_hex();
//!
//! let components = vec![json!({"name": "Alice"}), json!({"website": "https://alice.example"})];
//! let records = sign_profile_tokens(&components, private_key, "ES256K")?;
//! let profile = get_profile_from_tokens(&records, &public_key)?;
//! assert_eq!(profile["name"], "Alice");
//! # Ok::<(), profile_tokens::TokenError>(())
//! ```

// Module declarations (organized by functional domain)
pub mod clock;      // Issuance time source
pub mod error;      // Shared error type
pub mod models;     // Data structures
pub mod services;   // Signing, validation and assembly
pub mod settings;   // Environment configuration
pub mod token;      // Algorithms and envelope codec
pub mod utils;      // Helper functions
pub mod wallet;     // Key representations

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{Result, TokenError};
pub use models::profile::{Profile, ProfileComponent};
pub use models::token::{DecodedToken, Subject, TokenPayload, TokenRecord, TrustMode};
pub use services::assembler::{get_profile_from_token_values, get_profile_from_tokens};
pub use services::tokenizer::{sign_profile, sign_profile_tokens, ProfileTokenizer};
pub use services::verifier::{validate_token_record, validate_token_value, Verifier};
pub use settings::Settings;
pub use token::algorithm::SigningAlgorithm;
pub use token::codec::{Es256kCodec, TokenCodec};
pub use wallet::key_management::{KeyPair, PrivateKey, PublicKey};
