use std::sync::Arc;

use axum::{
    extract::State,
    Json,
};
use tracing::info;

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{ConfirmationRequest, EmailSendResponse};
use crate::services::{confirmation_email, ResendMailer};

/// The appointment confirmation function: renders the email and hands it to
/// the provider.
#[axum::debug_handler]
pub async fn send_appointment_confirmation(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<ConfirmationRequest>,
) -> Result<Json<EmailSendResponse>, AppError> {
    let mailer = ResendMailer::new(&config)?;

    let message = confirmation_email(&request, &config.email_from);
    let sent = mailer.send(&message).await?;

    info!(
        "Confirmation for {} with {} on {} at {} sent ({})",
        request.patient_name, request.doctor_name, request.date, request.time, sent.id
    );

    Ok(Json(sent))
}
