use axum::{
    Router,
    routing::get,
};

use crate::handlers;

/// Directory routes are public; the data is static and carries nothing
/// patient-specific.
pub fn doctor_routes() -> Router {
    Router::new()
        .route("/", get(handlers::search_doctors))
        .route("/{doctor_id}", get(handlers::get_doctor))
        .route("/{doctor_id}/availability", get(handlers::get_doctor_availability))
}
