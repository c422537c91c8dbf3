//! Authentication error types
//!
//! Every variant renders as HTTP 401 / gRPC `UNAUTHENTICATED`. The
//! variants only differ in the stable code handed to clients.

use thiserror::Error;

/// Authentication failures detected at the request boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No `Authorization` header on the request
    #[error("Authorization header is required")]
    MissingHeader,

    /// Header present but not exactly `Bearer <token>`
    #[error("Authorization header format must be Bearer {{token}}")]
    MalformedHeader,

    /// Signature mismatch, expired token, or missing `user_id` claim
    #[error("Invalid token")]
    InvalidToken,

    /// A handler expected an authenticated identity that was never bound
    #[error("User identity not found in request context")]
    IdentityMissing,

    /// Unknown login or wrong password
    #[error("Invalid login or password")]
    InvalidCredentials,
}

impl AuthError {
    /// Stable, machine-readable code for client handling
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingHeader => "MISSING_AUTH_HEADER",
            Self::MalformedHeader => "MALFORMED_AUTH_HEADER",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::IdentityMissing => "IDENTITY_MISSING",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
        }
    }
}
