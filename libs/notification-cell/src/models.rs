use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_database::SupabaseError;
use shared_models::error::AppError;

/// Payload of the appointment confirmation function. Field names match the
/// function's published camelCase contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationRequest {
    pub doctor_name: String,
    pub doctor_specialty: String,
    pub date: String,
    pub time: String,
    pub patient_email: String,
    pub patient_name: String,
    pub reason: String,
}

/// Outgoing message in the shape the Resend `/emails` endpoint accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailSendResponse {
    pub id: String,
}

#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("Email delivery is not configured")]
    NotConfigured,

    #[error("Missing recipient email address")]
    MissingRecipient,

    #[error("Email provider error ({status}): {message}")]
    Provider { status: u16, message: String },

    #[error("Confirmation function failed: {0}")]
    Function(#[from] SupabaseError),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl From<NotificationError> for AppError {
    fn from(err: NotificationError) -> Self {
        match err {
            NotificationError::MissingRecipient => AppError::ValidationError(err.to_string()),
            _ => AppError::Internal(err.to_string()),
        }
    }
}
