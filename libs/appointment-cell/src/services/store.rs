use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, error};

use shared_config::AppConfig;
use shared_database::SupabaseClient;

use crate::models::{AppointmentError, AppointmentRecord};

pub const APPOINTMENTS_TABLE: &str = "appointments";

#[async_trait]
pub trait AppointmentStore: Send + Sync {
    /// Writes one appointment row on behalf of the token's owner.
    async fn insert_appointment(&self, record: &AppointmentRecord, auth_token: &str) -> Result<(), AppointmentError>;
}

pub struct SupabaseAppointmentStore {
    supabase: SupabaseClient,
}

impl SupabaseAppointmentStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }
}

#[async_trait]
impl AppointmentStore for SupabaseAppointmentStore {
    async fn insert_appointment(&self, record: &AppointmentRecord, auth_token: &str) -> Result<(), AppointmentError> {
        debug!("Inserting appointment for user {} with doctor {}", record.user_id, record.doctor_id);

        self.supabase
            .insert_row(APPOINTMENTS_TABLE, auth_token, json!(record))
            .await
            .map_err(|e| {
                error!("Failed to store appointment: {}", e);
                AppointmentError::Persistence(e.to_string())
            })
    }
}
