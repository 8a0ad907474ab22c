// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for entire application

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// Application-specific error types
/// DOCUMENTATION: Every failure of a gallery or admin action ends up here
/// Each variant maps to appropriate HTTP status code and error response
#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation error: {0}")]
    #[allow(dead_code)]
    ValidationError(String),

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Forbidden access")]
    #[allow(dead_code)]
    Forbidden,

    #[error("Backend error: {0}")]
    BackendError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Upload error: {0}")]
    UploadError(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Internal server error")]
    #[allow(dead_code)]
    InternalError,
}

impl GalleryError {
    /// Machine-readable code used in JSON error bodies
    pub fn code(&self) -> &'static str {
        match self {
            GalleryError::NotFound(_) => "NOT_FOUND",
            GalleryError::InvalidInput(_) => "INVALID_INPUT",
            GalleryError::ValidationError(_) => "VALIDATION_ERROR",
            GalleryError::Unauthorized => "UNAUTHORIZED",
            GalleryError::Forbidden => "FORBIDDEN",
            GalleryError::BackendError(_) => "BACKEND_ERROR",
            GalleryError::ConfigError(_) => "CONFIG_ERROR",
            GalleryError::UploadError(_) => "UPLOAD_ERROR",
            GalleryError::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            GalleryError::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Message shown to the admin user in the status banner.
    /// Drops the variant prefix so backend messages read as-is.
    pub fn user_message(&self) -> String {
        match self {
            GalleryError::NotFound(msg)
            | GalleryError::InvalidInput(msg)
            | GalleryError::ValidationError(msg)
            | GalleryError::BackendError(msg)
            | GalleryError::ConfigError(msg)
            | GalleryError::UploadError(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

/// Convert GalleryError to HTTP response
/// DOCUMENTATION: Maps error types to HTTP status codes and JSON responses
impl ResponseError for GalleryError {
    fn error_response(&self) -> HttpResponse {
        let body = json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            }
        });

        HttpResponse::build(self.status_code()).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            GalleryError::NotFound(_) => StatusCode::NOT_FOUND,
            GalleryError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            GalleryError::ValidationError(_) => StatusCode::BAD_REQUEST,
            GalleryError::Unauthorized => StatusCode::UNAUTHORIZED,
            GalleryError::Forbidden => StatusCode::FORBIDDEN,
            GalleryError::BackendError(_) => StatusCode::BAD_GATEWAY,
            GalleryError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GalleryError::UploadError(_) => StatusCode::BAD_REQUEST,
            GalleryError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            GalleryError::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            GalleryError::NotFound("album".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            GalleryError::BackendError("boom".to_string()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            GalleryError::RateLimitExceeded.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[test]
    fn test_user_message_strips_prefix() {
        let err = GalleryError::InvalidInput("Thiếu vị trí banner.".to_string());
        assert_eq!(err.user_message(), "Thiếu vị trí banner.");
        assert_eq!(err.to_string(), "Invalid input: Thiếu vị trí banner.");
        assert_eq!(GalleryError::Unauthorized.user_message(), "Unauthorized access");
    }
}
