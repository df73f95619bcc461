//! Bearer-token issuance and validation.
//!
//! Tokens are HS256 JWTs whose subject is the user id. A token proves
//! identity for seven days; there is no refresh flow, clients log in again.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use grindtrack_core::UserId;

/// Days a token stays valid after issuance.
const TOKEN_VALIDITY_DAYS: i64 = 7;

/// Errors that can occur when issuing or validating tokens.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Token is expired.
    #[error("token expired")]
    Expired,

    /// Token is malformed, has a bad signature, or a bad subject.
    #[error("invalid token")]
    Invalid,

    /// Token could not be signed.
    #[error("token signing failed")]
    Signing,
}

/// JWT claims carried by a bearer token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Subject (user ID).
    sub: String,
    /// Issued at (seconds since epoch).
    iat: i64,
    /// Expiration time (seconds since epoch).
    exp: i64,
}

/// Issues and validates bearer tokens with a shared signing secret.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenService {
    /// Create a token service from the configured signing secret.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
        }
    }

    /// Issue a token for `user_id`, valid for seven days from `now`.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if encoding fails.
    pub fn issue(&self, user_id: UserId, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::days(TOKEN_VALIDITY_DAYS)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(|_| TokenError::Signing)
    }

    /// Validate a token and return the user it identifies.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Expired` for an expired token and
    /// `TokenError::Invalid` for any other validation failure.
    pub fn validate(&self, token: &str) -> Result<UserId, TokenError> {
        let data =
            decode::<Claims>(token, &self.decoding, &Validation::default()).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    _ => TokenError::Invalid,
                }
            })?;

        data.claims
            .sub
            .parse::<UserId>()
            .map_err(|_| TokenError::Invalid)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(&SecretString::from("kD93mFx2Lq8Rv5Tw1Yz6Bn4Hj7Pc0Sg3"))
    }

    #[test]
    fn test_issue_and_validate_roundtrip() {
        let tokens = service();
        let token = tokens.issue(UserId::new(42), Utc::now()).unwrap();
        let user_id = tokens.validate(&token).unwrap();
        assert_eq!(user_id, UserId::new(42));
    }

    #[test]
    fn test_expired_token_rejected() {
        let tokens = service();
        let issued = Utc::now() - Duration::days(TOKEN_VALIDITY_DAYS + 1);
        let token = tokens.issue(UserId::new(1), issued).unwrap();
        assert!(matches!(tokens.validate(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let tokens = service();
        let mut token = tokens.issue(UserId::new(1), Utc::now()).unwrap();
        token.push('x');
        assert!(matches!(tokens.validate(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let token = service().issue(UserId::new(1), Utc::now()).unwrap();
        let other = TokenService::new(&SecretString::from("zW4vQ9nT2xK7mC1pR8dJ5gY0aF6eL3Hs"));
        assert!(matches!(other.validate(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(
            service().validate("not-a-token"),
            Err(TokenError::Invalid)
        ));
    }
}
