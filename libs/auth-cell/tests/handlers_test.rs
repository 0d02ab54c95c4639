use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, HeaderValue},
};
use assert_matches::assert_matches;

use auth_cell::handlers::{get_session, validate_token, verify_token};
use auth_cell::router::AuthState;
use shared_models::error::AppError;
use shared_utils::test_utils::{JwtTestUtils, TestConfig, TestUser};

fn state(config: &TestConfig) -> State<Arc<AuthState>> {
    State(Arc::new(AuthState::new(config.to_arc())))
}

fn bearer(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        "Authorization",
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );
    headers
}

#[tokio::test]
async fn test_validate_token_success() {
    let config = TestConfig::default();
    let user = TestUser::patient("jane@example.com");
    let token = JwtTestUtils::create_test_token(&user, &config.jwt_secret, Some(24));

    let result = validate_token(state(&config), bearer(&token)).await;

    let response = result.unwrap().0;
    assert!(response.valid);
    assert_eq!(response.user_id, user.id);
    assert_eq!(response.email.as_deref(), Some("jane@example.com"));
    assert_eq!(response.role.as_deref(), Some("authenticated"));
}

#[tokio::test]
async fn test_validate_token_bad_signature() {
    let config = TestConfig::default();
    let token = JwtTestUtils::create_invalid_signature_token(&TestUser::default());

    let result = validate_token(state(&config), bearer(&token)).await;

    assert_matches!(result, Err(AppError::Auth(msg)) if msg == "Invalid token signature");
}

#[tokio::test]
async fn test_validate_token_missing_header() {
    let config = TestConfig::default();

    let result = validate_token(state(&config), HeaderMap::new()).await;

    assert_matches!(result, Err(AppError::Auth(msg)) if msg == "Missing authorization header");
}

#[tokio::test]
async fn test_verify_token_reports_validity() {
    let config = TestConfig::default();
    let user = TestUser::default();

    let good = JwtTestUtils::create_test_token(&user, &config.jwt_secret, None);
    let expired = JwtTestUtils::create_expired_token(&user, &config.jwt_secret);

    let response = verify_token(state(&config), bearer(&good)).await.unwrap();
    assert_eq!(response.0["valid"], true);

    let response = verify_token(state(&config), bearer(&expired)).await.unwrap();
    assert_eq!(response.0["valid"], false);
}

#[tokio::test]
async fn test_session_for_signed_in_user() {
    let config = TestConfig::default();
    let user = TestUser::patient("jane@example.com").with_name("Jane Doe");
    let token = JwtTestUtils::create_test_token(&user, &config.jwt_secret, None);

    let response = get_session(state(&config), bearer(&token)).await.0;

    let current = response.user.unwrap();
    assert_eq!(current.id, user.id);
    assert_eq!(current.email.as_deref(), Some("jane@example.com"));
    assert_eq!(current.metadata.unwrap()["name"], "Jane Doe");
}

#[tokio::test]
async fn test_session_is_null_without_valid_token() {
    let config = TestConfig::default();

    assert!(get_session(state(&config), HeaderMap::new()).await.0.user.is_none());

    let malformed = bearer(&JwtTestUtils::create_malformed_token());
    assert!(get_session(state(&config), malformed).await.0.user.is_none());
}
