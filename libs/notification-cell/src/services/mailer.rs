use reqwest::Client;
use tracing::{debug, error, info};

use shared_config::AppConfig;

use crate::models::{EmailMessage, EmailSendResponse, NotificationError};

/// Resend transactional email client.
/// See https://resend.com/docs/api-reference/emails/send-email
pub struct ResendMailer {
    client: Client,
    api_key: String,
    base_url: String,
}

impl ResendMailer {
    pub fn new(config: &AppConfig) -> Result<Self, NotificationError> {
        if !config.is_email_configured() {
            return Err(NotificationError::NotConfigured);
        }

        Ok(Self {
            client: Client::new(),
            api_key: config.resend_api_key.clone(),
            base_url: config.resend_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// POST /emails
    pub async fn send(&self, message: &EmailMessage) -> Result<EmailSendResponse, NotificationError> {
        if message.to.iter().all(|recipient| recipient.trim().is_empty()) {
            return Err(NotificationError::MissingRecipient);
        }

        let url = format!("{}/emails", self.base_url);
        debug!("Sending email '{}' via {}", message.subject, url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(message)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            error!("Resend send failed: {} - {}", status, response_text);
            let message = serde_json::from_str::<serde_json::Value>(&response_text)
                .ok()
                .and_then(|body| body.get("message").and_then(|m| m.as_str()).map(str::to_string))
                .unwrap_or(response_text);

            return Err(NotificationError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let sent: EmailSendResponse = serde_json::from_str(&response_text).map_err(|e| {
            NotificationError::Provider {
                status: status.as_u16(),
                message: format!("Failed to parse send response: {}", e),
            }
        })?;

        info!("Email {} accepted by provider", sent.id);
        Ok(sent)
    }
}
