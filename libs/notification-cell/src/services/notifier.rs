use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, warn};

use shared_config::{AppConfig, NotificationTransport};
use shared_database::SupabaseClient;

use crate::models::{ConfirmationRequest, NotificationError};
use crate::services::mailer::ResendMailer;
use crate::services::template::confirmation_email;

/// Sends the patient-facing confirmation after a booking has been stored.
#[async_trait]
pub trait ConfirmationNotifier: Send + Sync {
    async fn send_confirmation(
        &self,
        request: &ConfirmationRequest,
        auth_token: &str,
    ) -> Result<(), NotificationError>;
}

/// Invokes the hosted confirmation function with the caller's token.
pub struct EdgeFunctionNotifier {
    supabase: SupabaseClient,
    function_name: String,
}

impl EdgeFunctionNotifier {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            function_name: config.confirmation_function.clone(),
        }
    }
}

#[async_trait]
impl ConfirmationNotifier for EdgeFunctionNotifier {
    async fn send_confirmation(
        &self,
        request: &ConfirmationRequest,
        auth_token: &str,
    ) -> Result<(), NotificationError> {
        debug!("Invoking {} for {}", self.function_name, request.patient_email);

        self.supabase
            .invoke_function(&self.function_name, auth_token, json!(request))
            .await?;

        Ok(())
    }
}

/// Renders and sends the email from this process.
pub struct EmailNotifier {
    mailer: ResendMailer,
    from: String,
}

impl EmailNotifier {
    pub fn new(config: &AppConfig) -> Result<Self, NotificationError> {
        Ok(Self {
            mailer: ResendMailer::new(config)?,
            from: config.email_from.clone(),
        })
    }
}

#[async_trait]
impl ConfirmationNotifier for EmailNotifier {
    async fn send_confirmation(
        &self,
        request: &ConfirmationRequest,
        _auth_token: &str,
    ) -> Result<(), NotificationError> {
        let message = confirmation_email(request, &self.from);
        self.mailer.send(&message).await?;
        Ok(())
    }
}

/// Picks the notifier for the configured transport. Direct delivery without
/// Resend credentials falls back to the hosted function.
pub fn notifier_from_config(config: &AppConfig) -> Arc<dyn ConfirmationNotifier> {
    match config.notification_transport {
        NotificationTransport::Direct => match EmailNotifier::new(config) {
            Ok(notifier) => Arc::new(notifier),
            Err(e) => {
                warn!("Direct email transport unavailable ({}), using confirmation function", e);
                Arc::new(EdgeFunctionNotifier::new(config))
            }
        },
        NotificationTransport::EdgeFunction => Arc::new(EdgeFunctionNotifier::new(config)),
    }
}
