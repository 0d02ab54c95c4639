use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Where clients are sent when a route needs a signed-in user.
pub const SIGN_IN_PATH: &str = "/auth/signin";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Too many requests: {0}")]
    RateLimited(String),

    #[error("External service error: {0}")]
    ExternalService(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Auth(_) | AppError::AuthenticationRequired(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) | AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::ExternalService(_) => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::Auth(msg)
            | AppError::AuthenticationRequired(msg)
            | AppError::NotFound(msg)
            | AppError::BadRequest(msg)
            | AppError::Internal(msg)
            | AppError::Database(msg)
            | AppError::ValidationError(msg)
            | AppError::Conflict(msg)
            | AppError::RateLimited(msg)
            | AppError::ExternalService(msg) => msg,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.message();

        tracing::error!("Error: {}: {}", status, message);

        let body = match &self {
            AppError::AuthenticationRequired(_) => Json(json!({
                "error": message,
                "redirect": SIGN_IN_PATH
            })),
            _ => Json(json!({
                "error": message
            })),
        };

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::Auth("x".into()).status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::AuthenticationRequired("x".into()).status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::ValidationError("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::RateLimited("x".into()).status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(AppError::Database("x".into()).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(AppError::ExternalService("x".into()).status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_message_is_unprefixed() {
        let err = AppError::Database("duplicate key value violates unique constraint".into());
        assert_eq!(err.message(), "duplicate key value violates unique constraint");
        assert!(err.to_string().starts_with("Database error:"));
    }
}
