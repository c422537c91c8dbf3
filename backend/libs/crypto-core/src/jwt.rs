//! Shared JWT issuing and validation for the promo platform services
//!
//! Tokens are HS256-signed and carry the numeric user id, the issue time
//! and an expiry. Every service that validates tokens must be configured
//! with the same secret as the identity service that issues them.
//!
//! ## Usage
//!
//! ```rust
//! use std::time::Duration;
//! use crypto_core::jwt::TokenService;
//!
//! let tokens = TokenService::new(b"shared-secret", Duration::from_secs(3600));
//! let token = tokens.issue(42).unwrap();
//! assert_eq!(tokens.validate(&token).unwrap(), 42);
//! ```
//!
//! ## Limitations
//!
//! There is no refresh flow and no revocation list: a token stays valid
//! until `exp` even after the user's password changes.

use std::fmt;
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JWT algorithm - the only one accepted on validation
const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

/// Default lifetime of an issued token
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// JWT claims carried by every token
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Authenticated user's id
    pub user_id: i64,
    /// Issued at (Unix timestamp); optional on tokens from other issuers
    #[serde(default)]
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    /// Bad signature, expired, malformed, or missing `user_id`
    #[error("invalid token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),

    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Issues and validates HS256 tokens with a fixed lifetime.
///
/// Owned by each service and shared behind an `Arc`; key material is never
/// held in process-wide state.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Sign a token for `user_id` expiring `ttl` from now
    pub fn issue(&self, user_id: i64) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            user_id,
            iat: now,
            exp: now.saturating_add(i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX)),
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.encoding).map_err(TokenError::Signing)
    }

    /// Verify signature and expiry, returning the embedded user id
    pub fn validate(&self, token: &str) -> Result<i64, TokenError> {
        self.decode_claims(token).map(|claims| claims.user_id)
    }

    pub fn decode_claims(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "token validation failed");
                TokenError::Invalid(e)
            })
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &JWT_ALGORITHM)
            .field("secret", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &[u8] = b"test-secret-for-unit-tests-only";

    fn service() -> TokenService {
        TokenService::new(TEST_SECRET, DEFAULT_TOKEN_TTL)
    }

    fn sign_raw<T: Serialize>(claims: &T, secret: &[u8]) -> String {
        encode(
            &Header::new(JWT_ALGORITHM),
            claims,
            &EncodingKey::from_secret(secret),
        )
        .unwrap()
    }

    #[test]
    fn test_issue_and_validate() {
        let tokens = service();
        let token = tokens.issue(7).expect("Failed to issue token");

        assert_eq!(token.matches('.').count(), 2); // JWT has 3 parts
        assert_eq!(tokens.validate(&token).unwrap(), 7);
    }

    #[test]
    fn test_claims_expiry_matches_ttl() {
        let tokens = TokenService::new(TEST_SECRET, Duration::from_secs(600));
        let token = tokens.issue(1).unwrap();
        let claims = tokens.decode_claims(&token).unwrap();

        assert_eq!(claims.exp - claims.iat, 600);
    }

    #[test]
    fn test_validate_invalid_token() {
        let result = service().validate("invalid.token.here");
        assert!(matches!(result, Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_validate_tampered_signature() {
        let tokens = service();
        let token = tokens.issue(7).unwrap();

        let (head, sig) = token.rsplit_once('.').unwrap();
        let flipped = if sig.starts_with('A') { "B" } else { "A" };
        let tampered = format!("{head}.{flipped}{}", &sig[1..]);

        assert!(tokens.validate(&tampered).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = TokenService::new(b"another-secret", DEFAULT_TOKEN_TTL)
            .issue(7)
            .unwrap();
        assert!(service().validate(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            user_id: 7,
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = sign_raw(&claims, TEST_SECRET);

        assert!(service().validate(&token).is_err());
    }

    #[test]
    fn test_missing_user_id_rejected() {
        #[derive(Serialize)]
        struct NoUser {
            iat: i64,
            exp: i64,
        }

        let now = Utc::now().timestamp();
        let token = sign_raw(
            &NoUser {
                iat: now,
                exp: now + 3600,
            },
            TEST_SECRET,
        );

        assert!(service().validate(&token).is_err());
    }

    #[test]
    fn test_minimal_claims_accepted() {
        let now = Utc::now().timestamp();
        let token = sign_raw(
            &serde_json::json!({ "user_id": 7, "exp": now + 3600 }),
            TEST_SECRET,
        );

        assert_eq!(service().validate(&token).unwrap(), 7);
    }

    #[test]
    fn test_huge_ttl_saturates_expiry() {
        let tokens = TokenService::new(TEST_SECRET, Duration::from_secs(u64::MAX));
        let token = tokens.issue(7).unwrap();
        let claims = tokens.decode_claims(&token).unwrap();

        assert_eq!(claims.exp, i64::MAX);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_non_numeric_user_id_rejected() {
        let now = Utc::now().timestamp();
        let token = sign_raw(
            &serde_json::json!({ "user_id": "abc", "iat": now, "exp": now + 3600 }),
            TEST_SECRET,
        );

        assert!(service().validate(&token).is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let debug = format!("{:?}", service());
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("test-secret"));
    }
}
