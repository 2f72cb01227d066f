/// API routes and handlers
pub mod admin;
pub mod moderation;
pub mod profile;
pub mod verification;

use crate::{
    context::AppContext,
    error::{BaskerError, BaskerResult},
};
use axum::{extract::rejection::JsonRejection, Json, Router};

/// Build API routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .merge(admin::routes())
        .merge(verification::routes())
        .merge(moderation::routes())
        .merge(profile::routes())
}

/// Unwrap a JSON body, reporting malformed payloads as validation errors
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> BaskerResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| BaskerError::Validation(format!("Invalid request body: {}", e.body_text())))
}

/// Treat missing and whitespace-only strings alike
pub(crate) fn required_field(value: Option<String>, name: &str) -> BaskerResult<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| BaskerError::Validation(format!("{} is required", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_field() {
        assert_eq!(
            required_field(Some("acme-co".to_string()), "companyId").unwrap(),
            "acme-co"
        );
        assert!(required_field(Some("  ".to_string()), "companyId").is_err());
        assert!(required_field(None, "companyId").is_err());
    }
}
