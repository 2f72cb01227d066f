/// Unified error types for the Basker API server
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the server
#[derive(Error, Debug)]
pub enum BaskerError {
    /// No actor identifier header on a request that needs one
    #[error("Missing actor identity: {0}")]
    MissingIdentity(String),

    /// Actor is known but lacks the required capability
    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// State conflicts (e.g., reviewing an already reviewed request)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// An external AT Protocol service call failed
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Rate limiting errors
    #[error("Rate limit exceeded")]
    RateLimitExceeded { retry_after: std::time::Duration },

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BaskerError {
    /// Classify an error into the HTTP status returned at the route boundary
    pub fn status_code(&self) -> StatusCode {
        match self {
            BaskerError::MissingIdentity(_) => StatusCode::UNAUTHORIZED,
            BaskerError::NotAuthorized(_) => StatusCode::FORBIDDEN,
            BaskerError::Validation(_) => StatusCode::BAD_REQUEST,
            BaskerError::NotFound(_) => StatusCode::NOT_FOUND,
            BaskerError::Conflict(_) => StatusCode::CONFLICT,
            BaskerError::RateLimitExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            BaskerError::Upstream(_) | BaskerError::Internal(_) | BaskerError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Machine-readable error code for the response body
    pub fn error_code(&self) -> &'static str {
        match self {
            BaskerError::MissingIdentity(_) => "AuthenticationRequired",
            BaskerError::NotAuthorized(_) => "Forbidden",
            BaskerError::Validation(_) => "InvalidRequest",
            BaskerError::NotFound(_) => "NotFound",
            BaskerError::Conflict(_) => "Conflict",
            BaskerError::RateLimitExceeded { .. } => "RateLimitExceeded",
            BaskerError::Upstream(_) => "UpstreamFailure",
            BaskerError::Internal(_) | BaskerError::Io(_) => "InternalServerError",
        }
    }
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Convert BaskerError to HTTP response
impl IntoResponse for BaskerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error = self.error_code().to_string();

        let message = match &self {
            // Don't leak details
            BaskerError::Internal(_) | BaskerError::Io(_) => "Internal server error".to_string(),
            BaskerError::RateLimitExceeded { .. } => "Rate limit exceeded".to_string(),
            _ => self.to_string(),
        };

        (status, Json(ErrorResponse { error, message })).into_response()
    }
}

/// Result type alias for server operations
pub type BaskerResult<T> = Result<T, BaskerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        let cases = [
            (BaskerError::MissingIdentity("x".into()), StatusCode::UNAUTHORIZED),
            (BaskerError::NotAuthorized("x".into()), StatusCode::FORBIDDEN),
            (BaskerError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (BaskerError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (BaskerError::Conflict("x".into()), StatusCode::CONFLICT),
            (BaskerError::Upstream("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (BaskerError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(err.status_code(), expected, "{:?}", err);
        }
    }

    #[test]
    fn test_into_response_uses_classification() {
        let response = BaskerError::NotFound("Verification request abc".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = BaskerError::RateLimitExceeded {
            retry_after: std::time::Duration::from_secs(1),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}
