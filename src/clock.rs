// src/clock.rs
//! Time source for token issuance.
//!
//! Signing reads the clock exactly once per batch, so every token in a batch
//! shares the same `issuedAt` / `expiresAt` pair.

use crate::error::{Result, TokenError};
use chrono::{DateTime, Datelike, Utc};

/// Supplies the current instant.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant, for deterministic issuance.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Computes the expiry of a token issued at `issued_at`: the same instant one
/// calendar year later.
///
/// Feb 29 has no counterpart in the following year; it maps to Feb 28.
///
/// # Errors
/// `ExpiryOutOfRange` when the following year is past chrono's maximum date.
pub fn expiry_for(issued_at: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let next_year = issued_at.year() + 1;
    issued_at
        .with_year(next_year)
        .or_else(|| issued_at.with_day(28).and_then(|d| d.with_year(next_year)))
        .ok_or_else(|| TokenError::ExpiryOutOfRange(issued_at.to_rfc3339()))
}
