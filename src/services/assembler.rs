// src/services/assembler.rs
//! Profile assembly from validated token records.
//!
//! Records are validated in order against one trusted key. The first failure
//! aborts the assembly with that record's error; there is no best-effort mode.

use crate::error::Result;
use crate::models::profile::{merge_claim, Profile};
use crate::models::token::TokenRecord;
use crate::services::verifier::Verifier;
use crate::token::algorithm::SigningAlgorithm;
use crate::token::codec::TokenCodec;
use crate::wallet::key_management::PublicKey;
use log::debug;
use serde_json::Value;

impl<C: TokenCodec> Verifier<C> {
    /// Validates every record and merges their claims, later records
    /// overwriting earlier keys.
    ///
    /// # Arguments
    /// * `records` - Token records in merge order
    /// * `parent_public_key` - Trusted key applied to every record
    ///
    /// # Returns
    /// The merged profile.
    ///
    /// # Errors
    /// The first record's validation error, unchanged.
    pub fn assemble_profile(
        &self,
        records: &[TokenRecord],
        parent_public_key: &PublicKey,
    ) -> Result<Profile> {
        let mut profile = Profile::new();
        for record in records {
            self.merge_record(&mut profile, record, parent_public_key)?;
        }
        log_assembled(&profile, records.len());
        Ok(profile)
    }

    /// Same as [`Verifier::assemble_profile`] for raw JSON records. Each
    /// record's fields are checked as it is reached.
    pub fn assemble_profile_from_values(
        &self,
        records: &[Value],
        parent_public_key: &PublicKey,
    ) -> Result<Profile> {
        let mut profile = Profile::new();
        for record in records {
            let record = TokenRecord::from_value(record.clone())?;
            self.merge_record(&mut profile, &record, parent_public_key)?;
        }
        log_assembled(&profile, records.len());
        Ok(profile)
    }

    fn merge_record(
        &self,
        profile: &mut Profile,
        record: &TokenRecord,
        parent_public_key: &PublicKey,
    ) -> Result<()> {
        let decoded_token = self.validate(record, parent_public_key, SigningAlgorithm::Es256k)?;
        match decoded_token.claim() {
            Some(claim) => merge_claim(profile, claim),
            None => Ok(()),
        }
    }
}

fn log_assembled(profile: &Profile, record_count: usize) {
    debug!(
        "Assembled profile with {} key(s) from {} token record(s)",
        profile.len(),
        record_count
    );
}

/// Builds a profile from token records signed by one trusted key.
///
/// # Arguments
/// * `records` - Token records; later records overwrite earlier keys
/// * `parent_public_key` - Trusted key as SEC1 hex, applied to every record
///
/// # Returns
/// The merged profile mapping.
///
/// # Errors
/// `InvalidKey` for an unparsable trusted key, otherwise the first failing
/// record's validation error. No partial profile is returned.
pub fn get_profile_from_tokens(records: &[TokenRecord], parent_public_key: &str) -> Result<Profile> {
    let parent_public_key = PublicKey::from_hex(parent_public_key)?;
    Verifier::new().assemble_profile(records, &parent_public_key)
}

/// Same as [`get_profile_from_tokens`] for raw JSON records.
pub fn get_profile_from_token_values(records: &[Value], parent_public_key: &str) -> Result<Profile> {
    let parent_public_key = PublicKey::from_hex(parent_public_key)?;
    Verifier::new().assemble_profile_from_values(records, &parent_public_key)
}
