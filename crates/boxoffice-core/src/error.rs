//! Unified error types for all layers of the application.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for all layers of Box Office.
///
/// Cache misses are never represented here: a miss is `Ok(None)` and is the
/// expected trigger for the loader path.
#[derive(Error, Debug)]
pub enum BoxOfficeError {
    // ============ Domain Errors ============
    /// Resource not found
    #[error("Resource not found: {resource_type} with id {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Conflict error (e.g., seat already booked)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Business rule violation
    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    /// Forbidden access
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Dynamic pricing could not be computed from the stored rules
    #[error("Pricing error: {0}")]
    Pricing(String),

    // ============ Infrastructure Errors ============
    /// Storage error reported by a repository
    #[error("Database error: {0}")]
    Database(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Cache error
    #[error("Cache error: {0}")]
    Cache(String),

    /// Timeout error
    #[error("Operation timed out: {0}")]
    Timeout(String),

    // ============ Internal Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BoxOfficeError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Validation(_) | Self::BusinessRule(_) => 400,
            Self::Conflict(_) => 409,
            Self::Forbidden(_) => 403,
            Self::Pricing(_) => 422,
            Self::Timeout(_) => 503,
            Self::Database(_)
            | Self::Configuration(_)
            | Self::Cache(_)
            | Self::Internal(_)
            | Self::Other(_) => 500,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::BusinessRule(_) => "BUSINESS_RULE_VIOLATION",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Pricing(_) => "PRICING_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Cache(_) => "CACHE_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Creates a not found error for a resource.
    #[must_use]
    pub fn not_found<T: ToString>(resource_type: &'static str, id: T) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a conflict error.
    #[must_use]
    pub fn conflict<T: Into<String>>(message: T) -> Self {
        Self::Conflict(message.into())
    }

    /// Creates a forbidden error.
    #[must_use]
    pub fn forbidden<T: Into<String>>(message: T) -> Self {
        Self::Forbidden(message.into())
    }

    /// Creates a pricing error.
    #[must_use]
    pub fn pricing<T: Into<String>>(message: T) -> Self {
        Self::Pricing(message.into())
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration<T: Into<String>>(message: T) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// Checks if this error is retriable.
    ///
    /// The cache layer never retries; this is advice for the storage layer.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        matches!(
            self,
            Self::Database(_) | Self::Cache(_) | Self::Timeout(_)
        )
    }
}

impl From<serde_json::Error> for BoxOfficeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization error: {}", err))
    }
}

/// Serializable error response for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional field-level errors for validation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// Field-level validation error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldError {
    /// Field name
    pub field: String,
    /// Error message
    pub message: String,
    /// Error code
    pub code: String,
}

impl ErrorResponse {
    /// Creates a new error response from a `BoxOfficeError`.
    #[must_use]
    pub fn from_error(error: &BoxOfficeError) -> Self {
        Self {
            code: error.error_code().to_string(),
            message: error.to_string(),
            details: None,
        }
    }

    /// Sets field-level validation errors.
    #[must_use]
    pub fn with_details(mut self, details: Vec<FieldError>) -> Self {
        self.details = Some(details);
        self
    }
}

impl From<&BoxOfficeError> for ErrorResponse {
    fn from(error: &BoxOfficeError) -> Self {
        Self::from_error(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(BoxOfficeError::not_found("Event", 1).status_code(), 404);
        assert_eq!(BoxOfficeError::validation("bad seat").status_code(), 400);
        assert_eq!(BoxOfficeError::forbidden("not owner").status_code(), 403);
        assert_eq!(BoxOfficeError::conflict("seat taken").status_code(), 409);
        assert_eq!(BoxOfficeError::pricing("bad rule").status_code(), 422);
        assert_eq!(BoxOfficeError::configuration("ttl").status_code(), 500);
        assert_eq!(BoxOfficeError::Timeout("slow".to_string()).status_code(), 503);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(BoxOfficeError::not_found("Event", 1).error_code(), "NOT_FOUND");
        assert_eq!(BoxOfficeError::pricing("x").error_code(), "PRICING_ERROR");
        assert_eq!(BoxOfficeError::Cache("x".to_string()).error_code(), "CACHE_ERROR");
        assert_eq!(BoxOfficeError::internal("x").error_code(), "INTERNAL_ERROR");
        assert_eq!(
            BoxOfficeError::configuration("ttl must be positive").error_code(),
            "CONFIGURATION_ERROR"
        );
    }

    #[test]
    fn test_retriable_errors() {
        assert!(BoxOfficeError::Database("connection lost".to_string()).is_retriable());
        assert!(BoxOfficeError::Timeout("request timed out".to_string()).is_retriable());
        assert!(!BoxOfficeError::not_found("Event", 1).is_retriable());
        assert!(!BoxOfficeError::pricing("bad rule").is_retriable());
        assert!(!BoxOfficeError::configuration("zero ttl").is_retriable());
    }

    #[test]
    fn test_error_display() {
        let err = BoxOfficeError::not_found("Booking", "abc");
        assert!(err.to_string().contains("Booking"));
        assert!(err.to_string().contains("abc"));
    }

    #[test]
    fn test_error_response_from_error() {
        let err = BoxOfficeError::not_found("Event", 1);
        let response = ErrorResponse::from_error(&err);
        assert_eq!(response.code, "NOT_FOUND");
        assert!(!response.message.is_empty());
        assert!(response.details.is_none());
    }

    #[test]
    fn test_error_response_with_details() {
        let err = BoxOfficeError::validation("bad input");
        let details = vec![FieldError {
            field: "total_seats".to_string(),
            message: "must be at least 1".to_string(),
            code: "range".to_string(),
        }];
        let response = ErrorResponse::from(&err).with_details(details);
        assert_eq!(response.details.map(|d| d.len()), Some(1));
    }
}
