use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
    middleware,
};

use notification_cell::services::{notifier_from_config, ConfirmationNotifier};
use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;
use crate::services::{AppointmentBookingService, AppointmentStore, FlowRegistry, SupabaseAppointmentStore};

pub struct AppointmentState {
    pub config: Arc<AppConfig>,
    pub booking: AppointmentBookingService,
    pub flows: FlowRegistry,
}

impl AppointmentState {
    pub fn new(config: Arc<AppConfig>) -> Self {
        let store: Arc<dyn AppointmentStore> = Arc::new(SupabaseAppointmentStore::new(&config));
        let notifier = notifier_from_config(&config);
        Self::with_services(config, store, notifier)
    }

    pub fn with_services(
        config: Arc<AppConfig>,
        store: Arc<dyn AppointmentStore>,
        notifier: Arc<dyn ConfirmationNotifier>,
    ) -> Self {
        Self {
            config,
            booking: AppointmentBookingService::new(store, notifier),
            flows: FlowRegistry::new(),
        }
    }
}

pub fn appointment_routes(config: Arc<AppConfig>) -> Router {
    appointment_routes_with_state(Arc::new(AppointmentState::new(config)))
}

pub fn appointment_routes_with_state(state: Arc<AppointmentState>) -> Router {
    Router::new()
        .route("/", post(handlers::book_appointment))
        .route("/flows", post(handlers::create_flow))
        .route("/flows/{flow_id}", get(handlers::get_flow).delete(handlers::delete_flow))
        .route("/flows/{flow_id}/search", put(handlers::update_search))
        .route("/flows/{flow_id}/step", post(handlers::navigate_flow))
        .route("/flows/{flow_id}/slot", post(handlers::select_slot))
        .route("/flows/{flow_id}/reason", put(handlers::update_reason))
        .route("/flows/{flow_id}/submit", post(handlers::submit_flow))
        .layer(middleware::from_fn_with_state(state.config.clone(), auth_middleware))
        .with_state(state)
}
