// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::database::DatabaseError;
use crate::validator::FieldErrors;

pub const GENERIC_SERVER_ERROR: &str = "Something went wrong on the server";
pub const DUPLICATE_MESSAGE: &str = "Duplicate field value entered.";

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    // 400 Bad Request
    #[error("{message}")]
    ValidationError { message: String, field_errors: FieldErrors },

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    InvalidJson(String),

    #[error("{}", DUPLICATE_MESSAGE)]
    Constraint(String),

    // 404 Not Found
    #[error("{0}")]
    NotFound(String),

    // 413 Payload Too Large
    #[error("{0}")]
    PayloadTooLarge(String),

    // 500 Internal Server Error
    #[error("{0}")]
    InternalServerError(String),

    #[error("{0}")]
    Database(DatabaseError),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            ApiError::Constraint(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Expected failures whose message is safe to show to clients
    pub fn is_operational(&self) -> bool {
        !matches!(self, ApiError::InternalServerError(_) | ApiError::Database(_))
    }

    /// "fail" for client errors, "error" for server errors
    pub fn status(&self) -> &'static str {
        if self.status_code().is_client_error() {
            "fail"
        } else {
            "error"
        }
    }

    /// Get client-safe error message
    pub fn public_message(&self) -> String {
        if self.is_operational() {
            self.to_string()
        } else {
            GENERIC_SERVER_ERROR.to_string()
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::ValidationError { .. } => "VALIDATION_ERROR",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::InvalidJson(_) => "INVALID_JSON",
            ApiError::Constraint(_) => "CONSTRAINT_VIOLATION",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::Database(_) => "DATABASE_ERROR",
        }
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ApiError::ValidationError { field_errors, .. } => Some(field_errors),
            _ => None,
        }
    }

    /// Convert to the production JSON response body
    pub fn to_json(&self) -> Value {
        let mut body = json!({
            "success": false,
            "message": self.public_message(),
            "code": self.error_code(),
        });
        if let Some(errors) = self.field_errors() {
            body["errors"] = json!(errors);
        }
        body
    }

    /// Everything known about the failure, for development responses
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            status: self.status(),
            message: self.to_string(),
            code: self.error_code(),
            errors: self.field_errors().cloned(),
            detail: format!("{:?}", self),
        }
    }
}

// Static constructor methods
impl ApiError {
    pub fn validation_error(message: impl Into<String>, field_errors: FieldErrors) -> Self {
        ApiError::ValidationError {
            message: message.into(),
            field_errors,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn invalid_json(message: impl Into<String>) -> Self {
        ApiError::InvalidJson(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(msg) => ApiError::not_found(msg),
            DatabaseError::Constraint(detail) => ApiError::Constraint(detail),
            other => ApiError::Database(other),
        }
    }
}

/// Full error description attached to error responses. The error boundary
/// middleware swaps it in as the body when running in development.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub status: &'static str,
    pub message: String,
    pub code: &'static str,
    pub errors: Option<FieldErrors>,
    pub detail: String,
}

impl ErrorReport {
    pub fn to_json(&self) -> Value {
        let mut body = json!({
            "success": false,
            "status": self.status,
            "message": self.message,
            "code": self.code,
            "detail": self.detail,
        });
        if let Some(errors) = &self.errors {
            body["errors"] = json!(errors);
        }
        body
    }
}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        if self.is_operational() {
            tracing::debug!("{} {}: {}", status.as_u16(), self.error_code(), self);
        } else {
            tracing::error!("{} {}: {:?}", status.as_u16(), self.error_code(), self);
        }

        let mut response = (status, Json(self.to_json())).into_response();
        response.extensions_mut().insert(self.report());
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_body_carries_field_errors() {
        let mut errors = FieldErrors::new();
        errors.insert("age".into(), "Min value is 18".into());
        let err = ApiError::validation_error("Validation failed", errors);

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.status(), "fail");
        let body = err.to_json();
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["message"], json!("Validation failed"));
        assert_eq!(body["errors"]["age"], json!("Min value is 18"));
    }

    #[test]
    fn database_not_found_maps_to_404() {
        let err: ApiError = DatabaseError::NotFound("No submission found with that ID".into()).into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_json()["message"], json!("No submission found with that ID"));
        assert!(err.to_json().get("errors").is_none());
    }

    #[test]
    fn constraint_uses_generic_duplicate_message() {
        let err: ApiError = DatabaseError::Constraint("UNIQUE constraint failed: submissions.id".into()).into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.public_message(), DUPLICATE_MESSAGE);
        assert!(err.report().detail.contains("UNIQUE"));
    }

    #[test]
    fn non_operational_errors_hide_their_message() {
        let err = ApiError::internal_server_error("connection pool exhausted");
        assert!(!err.is_operational());
        assert_eq!(err.status(), "error");
        assert_eq!(err.to_json()["message"], json!(GENERIC_SERVER_ERROR));
        assert_eq!(err.report().message, "connection pool exhausted");
    }
}
