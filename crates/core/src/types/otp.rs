//! One-time code used for email verification during signup.

use core::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`OtpCode`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum OtpError {
    /// The code is not exactly six characters long.
    #[error("code must be exactly {expected} digits")]
    WrongLength {
        /// Required number of digits.
        expected: usize,
    },
    /// The code contains a non-digit character.
    #[error("code must contain only digits")]
    NonDigit,
}

/// A 6-digit numeric one-time code.
///
/// Codes are compared as strings; leading zeros never occur because
/// generation draws from `[100000, 1000000)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OtpCode(String);

impl OtpCode {
    /// Number of digits in a code.
    pub const LENGTH: usize = 6;

    /// Minutes a code stays valid after issuance.
    pub const VALIDITY_MINUTES: i64 = 10;

    /// Parse a code from client input.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not exactly six ASCII digits.
    pub fn parse(s: &str) -> Result<Self, OtpError> {
        let s = s.trim();
        if s.len() != Self::LENGTH {
            return Err(OtpError::WrongLength {
                expected: Self::LENGTH,
            });
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(OtpError::NonDigit);
        }
        Ok(Self(s.to_owned()))
    }

    /// Wrap a freshly generated numeric code.
    ///
    /// The value must already be in `[100000, 1000000)`; callers generate it
    /// with the auth service's code generator.
    #[must_use]
    pub fn from_number(n: u32) -> Self {
        debug_assert!((100_000..1_000_000).contains(&n));
        Self(n.to_string())
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Expiry timestamp for a code issued at `now`.
    #[must_use]
    pub fn expiry_from(now: DateTime<Utc>) -> DateTime<Utc> {
        now + Duration::minutes(Self::VALIDITY_MINUTES)
    }
}

impl fmt::Display for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
