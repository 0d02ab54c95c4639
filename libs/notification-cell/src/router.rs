use std::sync::Arc;

use axum::{
    Router,
    routing::post,
    middleware,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

/// Callers present the patient's Supabase token, as the booking flow does
/// when it invokes the function.
pub fn notification_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/send-appointment-confirmation", post(handlers::send_appointment_confirmation))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
