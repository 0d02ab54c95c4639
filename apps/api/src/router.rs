use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use appointment_cell::router::appointment_routes;
use auth_cell::router::auth_routes;
use doctor_cell::router::doctor_routes;
use medication_cell::router::medication_routes;
use notification_cell::router::notification_routes;
use shared_config::AppConfig;
use shared_models::error::AppError;

async fn not_found() -> AppError {
    AppError::NotFound("Page not found".to_string())
}

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic Care API is running!" }))
        .nest("/auth", auth_routes(state.clone()))
        .nest("/doctors", doctor_routes())
        .nest("/medications", medication_routes(state.clone()))
        .nest("/appointments", appointment_routes(state.clone()))
        .nest("/functions", notification_routes(state))
        .fallback(not_found)
}
