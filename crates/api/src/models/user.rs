//! User domain types.

use chrono::{DateTime, Utc};

use grindtrack_core::{Email, OtpCode, ProgressSet, UserId};

/// A registered account (domain type).
///
/// Carries the sparse progress overlay; each toggle request rewrites the
/// whole overlay back to the row in a single write.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Normalized email address.
    pub email: Email,
    /// Argon2id password hash.
    pub password_hash: String,
    /// Whether the email has been verified.
    pub is_verified: bool,
    /// Pending one-time code, cleared on verification.
    pub otp_code: Option<OtpCode>,
    /// When the pending code expires.
    pub otp_expires: Option<DateTime<Utc>>,
    /// Sparse per-problem progress overlay.
    pub progress: ProgressSet,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether the stored code matches `candidate` and has not expired.
    ///
    /// Returns `None` when no code is pending.
    #[must_use]
    pub fn otp_state(&self, candidate: &OtpCode, now: DateTime<Utc>) -> Option<OtpCheck> {
        let code = self.otp_code.as_ref()?;
        if code != candidate {
            return Some(OtpCheck::Mismatch);
        }
        match self.otp_expires {
            Some(expires) if expires >= now => Some(OtpCheck::Valid),
            _ => Some(OtpCheck::Expired),
        }
    }
}

/// Outcome of checking a candidate OTP against the stored one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpCheck {
    /// Code matches and is within its validity window.
    Valid,
    /// Code does not match.
    Mismatch,
    /// Code matches but the window has passed.
    Expired,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn user_with_otp(code: &str, expires_in: Duration) -> User {
        let now = Utc::now();
        User {
            id: UserId::new(1),
            email: Email::parse("test@example.com").unwrap(),
            password_hash: String::new(),
            is_verified: false,
            otp_code: Some(OtpCode::parse(code).unwrap()),
            otp_expires: Some(now + expires_in),
            progress: ProgressSet::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_otp_valid_within_window() {
        let user = user_with_otp("123456", Duration::minutes(5));
        let candidate = OtpCode::parse("123456").unwrap();
        assert_eq!(user.otp_state(&candidate, Utc::now()), Some(OtpCheck::Valid));
    }

    #[test]
    fn test_otp_mismatch() {
        let user = user_with_otp("123456", Duration::minutes(5));
        let candidate = OtpCode::parse("654321").unwrap();
        assert_eq!(
            user.otp_state(&candidate, Utc::now()),
            Some(OtpCheck::Mismatch)
        );
    }

    #[test]
    fn test_otp_expired() {
        let user = user_with_otp("123456", Duration::minutes(-1));
        let candidate = OtpCode::parse("123456").unwrap();
        assert_eq!(
            user.otp_state(&candidate, Utc::now()),
            Some(OtpCheck::Expired)
        );
    }

    #[test]
    fn test_otp_none_pending() {
        let mut user = user_with_otp("123456", Duration::minutes(5));
        user.otp_code = None;
        let candidate = OtpCode::parse("123456").unwrap();
        assert_eq!(user.otp_state(&candidate, Utc::now()), None);
    }
}
