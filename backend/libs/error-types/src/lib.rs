//! Unified error types for the promo platform services
//!
//! One taxonomy is shared by every service so that an error raised deep in
//! a repository surfaces with the same meaning over HTTP and over gRPC:
//!
//! - `InvalidInput`: bad request shape or range (400 / INVALID_ARGUMENT)
//! - `Unauthenticated`: token or credential problems (401 / UNAUTHENTICATED)
//! - `PermissionDenied`: ownership violation (403 / PERMISSION_DENIED)
//! - `NotFound` (404 / NOT_FOUND)
//! - `Conflict`: uniqueness violation (409 / ALREADY_EXISTS)
//! - `Internal`: anything unexpected (500 / INTERNAL), never shown to clients
//!
//! Client-facing messages never carry internal detail; the source of an
//! `Internal` error is only written to the server log.

use tonic::metadata::MetadataValue;
use tonic::{Code, Status};
use thiserror::Error;

pub mod auth;
#[cfg(feature = "sqlx")]
pub mod database;
pub mod http;
#[cfg(feature = "validator")]
pub mod validation;

pub use auth::AuthError;
pub use http::{FieldError, HttpErrorResponse};

/// gRPC metadata key carrying the stable error code across the RPC boundary
pub const ERROR_CODE_METADATA: &str = "x-error-code";

/// Core service error type used across all services
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Invalid input provided
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Request body failed field-level validation
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        field_errors: Vec<FieldError>,
    },

    /// Authentication required or failed
    #[error("Authentication failed: {source}")]
    Unauthenticated {
        #[source]
        source: AuthError,
    },

    /// Caller is authenticated but does not own the resource
    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    /// Resource not found
    #[error("{message}")]
    NotFound { message: String },

    /// Uniqueness violation (duplicate code, login, email)
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// Downstream service failed or is unreachable
    #[error("External service error: {service}")]
    ExternalService {
        service: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Downstream call exceeded its deadline
    #[error("Operation timed out: {operation}")]
    Timeout { operation: String },

    /// Internal server error (catch-all)
    #[error("Internal server error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str) -> Self {
        Self::NotFound {
            message: format!("{resource} not found"),
        }
    }

    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create internal error from any error type
    pub fn internal<E: Into<anyhow::Error>>(error: E) -> Self {
        Self::Internal {
            source: error.into(),
        }
    }

    /// Stable, machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } | Self::Validation { .. } => "VALIDATION_FAILED",
            Self::Unauthenticated { source } => source.code(),
            Self::PermissionDenied { .. } => "FORBIDDEN",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Conflict { .. } => "CONFLICT",
            Self::ExternalService { .. } => "BAD_GATEWAY",
            Self::Timeout { .. } => "TIMEOUT",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Message that is safe to hand to an external caller
    pub fn public_message(&self) -> String {
        match self {
            Self::InvalidInput { message }
            | Self::Validation { message, .. }
            | Self::PermissionDenied { message }
            | Self::NotFound { message }
            | Self::Conflict { message } => message.clone(),
            Self::Unauthenticated { source } => source.to_string(),
            Self::ExternalService { service, .. } => format!("{service} is unavailable"),
            Self::Timeout { operation } => format!("{operation} timed out"),
            Self::Internal { .. } => "Internal server error".to_string(),
        }
    }

    /// Convert to gRPC Status for service boundaries
    pub fn to_status(&self) -> Status {
        let code = match self {
            Self::InvalidInput { .. } | Self::Validation { .. } => Code::InvalidArgument,
            Self::Unauthenticated { .. } => Code::Unauthenticated,
            Self::PermissionDenied { .. } => Code::PermissionDenied,
            Self::NotFound { .. } => Code::NotFound,
            Self::Conflict { .. } => Code::AlreadyExists,
            Self::ExternalService { .. } => Code::Unavailable,
            Self::Timeout { .. } => Code::DeadlineExceeded,
            Self::Internal { .. } => Code::Internal,
        };

        let mut status = Status::new(code, self.public_message());
        status
            .metadata_mut()
            .insert(ERROR_CODE_METADATA, MetadataValue::from_static(self.code()));
        status
    }

    /// Log error with appropriate level and context
    pub fn log(&self) {
        match self {
            Self::InvalidInput { .. }
            | Self::Validation { .. }
            | Self::NotFound { .. }
            | Self::Conflict { .. } => {
                tracing::debug!(error = %self, "Client error");
            }
            Self::Unauthenticated { .. } | Self::PermissionDenied { .. } => {
                tracing::warn!(error = %self, "Authorization failure");
            }
            Self::ExternalService { .. } | Self::Timeout { .. } => {
                tracing::warn!(error = ?self, "Dependency issue");
            }
            Self::Internal { source } => {
                tracing::error!(error = ?source, "Server error");
            }
        }
    }
}

impl From<AuthError> for ServiceError {
    fn from(source: AuthError) -> Self {
        Self::Unauthenticated { source }
    }
}

/// Re-translate an RPC status into the shared taxonomy.
///
/// Used by HTTP adapters that sit in front of a gRPC backend so that the
/// same HTTP status table applies whether the backend is local or remote.
impl From<Status> for ServiceError {
    fn from(status: Status) -> Self {
        let message = status.message().to_string();
        match status.code() {
            Code::InvalidArgument | Code::OutOfRange => Self::InvalidInput { message },
            Code::Unauthenticated => {
                let source = match status
                    .metadata()
                    .get(ERROR_CODE_METADATA)
                    .and_then(|v| v.to_str().ok())
                {
                    Some("MISSING_AUTH_HEADER") => AuthError::MissingHeader,
                    Some("MALFORMED_AUTH_HEADER") => AuthError::MalformedHeader,
                    Some("IDENTITY_MISSING") => AuthError::IdentityMissing,
                    Some("INVALID_CREDENTIALS") => AuthError::InvalidCredentials,
                    _ => AuthError::InvalidToken,
                };
                Self::Unauthenticated { source }
            }
            Code::PermissionDenied => Self::PermissionDenied { message },
            Code::NotFound => Self::NotFound { message },
            Code::AlreadyExists => Self::Conflict { message },
            Code::DeadlineExceeded | Code::Cancelled => Self::Timeout {
                operation: "rpc call".to_string(),
            },
            Code::Unavailable => Self::ExternalService {
                service: "rpc backend".to_string(),
                source: Box::new(status),
            },
            _ => Self::internal(anyhow::anyhow!("rpc error: {}", status)),
        }
    }
}

impl From<ServiceError> for Status {
    fn from(err: ServiceError) -> Self {
        err.log();
        err.to_status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_to_status_conversion() {
        let status = ServiceError::not_found("promocode").to_status();
        assert_eq!(status.code(), Code::NotFound);
        assert_eq!(status.message(), "promocode not found");
    }

    #[test]
    fn test_permission_denied_is_not_internal() {
        let status = ServiceError::permission_denied("not the owner").to_status();
        assert_eq!(status.code(), Code::PermissionDenied);

        let back = ServiceError::from(status);
        assert!(matches!(back, ServiceError::PermissionDenied { .. }));
    }

    #[test]
    fn test_internal_hides_source() {
        let err = ServiceError::internal(anyhow::anyhow!(
            "duplicate key value violates unique constraint \"promocodes_code_key\""
        ));
        let status = err.to_status();

        assert_eq!(status.code(), Code::Internal);
        assert_eq!(status.message(), "Internal server error");
        assert!(!status.message().contains("constraint"));
    }

    #[test]
    fn test_auth_error_code_survives_rpc_boundary() {
        let status = ServiceError::from(AuthError::InvalidCredentials).to_status();
        let back = ServiceError::from(status);

        match back {
            ServiceError::Unauthenticated { source } => {
                assert_eq!(source, AuthError::InvalidCredentials)
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_status_code_table() {
        let cases = [
            (Status::invalid_argument("bad"), "VALIDATION_FAILED"),
            (Status::unauthenticated("no"), "INVALID_TOKEN"),
            (Status::permission_denied("no"), "FORBIDDEN"),
            (Status::not_found("gone"), "NOT_FOUND"),
            (Status::already_exists("dup"), "CONFLICT"),
            (Status::deadline_exceeded("slow"), "TIMEOUT"),
            (Status::unavailable("down"), "BAD_GATEWAY"),
            (Status::internal("boom"), "INTERNAL_ERROR"),
            (Status::unknown("?"), "INTERNAL_ERROR"),
        ];

        for (status, expected) in cases {
            assert_eq!(ServiceError::from(status).code(), expected);
        }
    }
}
