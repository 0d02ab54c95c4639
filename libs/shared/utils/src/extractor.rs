use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use shared_config::AppConfig;
use shared_models::auth::Session;
use shared_models::error::AppError;

use crate::jwt::validate_token;

/// Pulls the token out of an `Authorization: Bearer ...` header.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<String, AppError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::Auth("Missing authorization header".to_string()))?;

    let auth_value = auth_header
        .to_str()
        .map_err(|_| AppError::Auth("Invalid authorization header format".to_string()))?;

    match auth_value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(AppError::Auth("Invalid authorization header format".to_string())),
    }
}

/// Resolves the verified session for a request, if any.
pub fn session_from_headers(headers: &HeaderMap, jwt_secret: &str) -> Result<Session, AppError> {
    let token = extract_bearer_token(headers)?;

    let user = validate_token(&token, jwt_secret)
        .map_err(|e| AppError::Auth(e.to_string()))?;

    Ok(Session {
        user,
        access_token: token,
    })
}

/// Gate for session-only routes. Requests without a verified session are
/// turned away with a sign-in redirect; otherwise `Session` and `User` are
/// placed in the request extensions.
pub async fn auth_middleware(
    State(config): State<Arc<AppConfig>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let session = session_from_headers(request.headers(), &config.supabase_jwt_secret)
        .map_err(|e| {
            debug!("Rejecting request to {}: {}", request.uri().path(), e.message());
            AppError::AuthenticationRequired(e.message().to_string())
        })?;

    request.extensions_mut().insert(session.user.clone());
    request.extensions_mut().insert(session);

    Ok(next.run(request).await)
}
