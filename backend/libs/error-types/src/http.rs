//! HTTP error response handling
//!
//! Every service renders failures as the same JSON envelope so that the
//! gateway and its callers see one error shape regardless of origin.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};

use crate::ServiceError;

/// Standard HTTP error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct HttpErrorResponse {
    /// HTTP status code
    pub status: u16,

    /// Error code for client handling
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Field-level validation errors
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub field_errors: Vec<FieldError>,

    /// Timestamp of the error
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Field-level error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl HttpErrorResponse {
    pub fn new(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
            field_errors: Vec::new(),
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn with_field_errors(mut self, errors: Vec<FieldError>) -> Self {
        self.field_errors = errors;
        self
    }
}

impl ServiceError {
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::InvalidInput { .. } | Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            Self::PermissionDenied { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::ExternalService { .. } => StatusCode::BAD_GATEWAY,
            Self::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<&ServiceError> for HttpErrorResponse {
    fn from(error: &ServiceError) -> Self {
        let response = HttpErrorResponse::new(
            error.http_status().as_u16(),
            error.code(),
            error.public_message(),
        );

        match error {
            ServiceError::Validation { field_errors, .. } => {
                response.with_field_errors(field_errors.clone())
            }
            _ => response,
        }
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        self.http_status()
    }

    fn error_response(&self) -> HttpResponse {
        self.log();
        HttpResponse::build(self.http_status()).json(HttpErrorResponse::from(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AuthError;
    use actix_web::body::to_bytes;

    #[test]
    fn test_error_response_serialization() {
        let response = HttpErrorResponse::new(404, "NOT_FOUND", "promocode not found");

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":404"));
        assert!(json.contains("\"code\":\"NOT_FOUND\""));
        assert!(!json.contains("field_errors"));
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ServiceError::invalid_input("page must be positive").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::from(AuthError::MissingHeader).http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ServiceError::permission_denied("not the owner").http_status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ServiceError::conflict("code already exists").http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServiceError::internal(anyhow::anyhow!("pool closed")).http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn test_validation_error_body() {
        let err = ServiceError::Validation {
            message: "Validation failed".into(),
            field_errors: vec![FieldError {
                field: "discount".into(),
                code: "range".into(),
                message: "discount must be between 0 and 100".into(),
            }],
        };

        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let parsed: HttpErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed.code, "VALIDATION_FAILED");
        assert_eq!(parsed.field_errors.len(), 1);
        assert_eq!(parsed.field_errors[0].field, "discount");
    }

    #[actix_web::test]
    async fn test_internal_body_is_generic() {
        let err = ServiceError::internal(anyhow::anyhow!("connection refused on 10.0.0.3:5432"));
        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();

        assert!(text.contains("Internal server error"));
        assert!(!text.contains("10.0.0.3"));
    }
}
