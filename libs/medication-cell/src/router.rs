use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
    middleware,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn medication_routes(state: Arc<AppConfig>) -> Router {
    // The checker is only offered to signed-in users
    Router::new()
        .route("/", get(handlers::list_medications))
        .route("/{medication_id}", get(handlers::get_medication))
        .route("/interactions/check", post(handlers::check_interactions))
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}
