use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use shared_config::AppConfig;

use crate::handlers;
use crate::services::IdentityService;

pub struct AuthState {
    pub config: Arc<AppConfig>,
    pub identity: IdentityService,
}

impl AuthState {
    pub fn new(config: Arc<AppConfig>) -> Self {
        let identity = IdentityService::new(&config);
        Self { config, identity }
    }
}

pub fn auth_routes(config: Arc<AppConfig>) -> Router {
    auth_routes_with_state(Arc::new(AuthState::new(config)))
}

pub fn auth_routes_with_state(state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/signin", post(handlers::sign_in))
        .route("/signup", post(handlers::sign_up))
        .route("/signout", post(handlers::sign_out))
        .route("/session", get(handlers::get_session))
        .route("/validate", post(handlers::validate_token))
        .route("/verify", post(handlers::verify_token))
        .with_state(state)
}
