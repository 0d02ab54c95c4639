use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::{HeaderMap, StatusCode},
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::json;
use tracing::debug;

use shared_models::auth::{AuthSession, CurrentUser, TokenResponse};
use shared_models::error::AppError;
use shared_utils::extractor::{extract_bearer_token, session_from_headers};
use shared_utils::jwt::validate_token as validate_jwt;

use crate::models::{SessionResponse, SignInRequest, SignUpRequest, SignUpResponse};
use crate::router::AuthState;

#[axum::debug_handler]
pub async fn sign_in(
    State(state): State<Arc<AuthState>>,
    Json(request): Json<SignInRequest>,
) -> Result<Json<AuthSession>, AppError> {
    let session = state.identity.sign_in(&request).await?;

    Ok(Json(session))
}

#[axum::debug_handler]
pub async fn sign_up(
    State(state): State<Arc<AuthState>>,
    Json(request): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<SignUpResponse>), AppError> {
    let created = state.identity.sign_up(&request).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

#[axum::debug_handler]
pub async fn sign_out(
    State(state): State<Arc<AuthState>>,
    TypedHeader(Authorization(bearer)): TypedHeader<Authorization<Bearer>>,
) -> Result<StatusCode, AppError> {
    state.identity.sign_out(bearer.token()).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// The signed-in user, or `null` when the bearer token is missing or invalid.
#[axum::debug_handler]
pub async fn get_session(
    State(state): State<Arc<AuthState>>,
    headers: HeaderMap,
) -> Json<SessionResponse> {
    let user = match session_from_headers(&headers, &state.config.supabase_jwt_secret) {
        Ok(session) => Some(CurrentUser::from(&session.user)),
        Err(e) => {
            debug!("No active session: {}", e.message());
            None
        }
    };

    Json(SessionResponse { user })
}

#[axum::debug_handler]
pub async fn validate_token(
    State(state): State<Arc<AuthState>>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, AppError> {
    debug!("Validating token");

    let token = extract_bearer_token(&headers)?;

    let user = validate_jwt(&token, &state.config.supabase_jwt_secret)
        .map_err(|e| AppError::Auth(e.to_string()))?;

    Ok(Json(TokenResponse {
        valid: true,
        user_id: user.id,
        email: user.email,
        role: user.role,
    }))
}

#[axum::debug_handler]
pub async fn verify_token(
    State(state): State<Arc<AuthState>>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    debug!("Verifying token");

    let token = extract_bearer_token(&headers)?;
    let valid = validate_jwt(&token, &state.config.supabase_jwt_secret).is_ok();

    Ok(Json(json!({ "valid": valid })))
}
