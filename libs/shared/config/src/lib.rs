use std::env;
use tracing::warn;

pub const DEFAULT_CONFIRMATION_FUNCTION: &str = "send-appointment-confirmation";
pub const DEFAULT_RESEND_BASE_URL: &str = "https://api.resend.com";
pub const DEFAULT_EMAIL_FROM: &str = "Appointment Confirmation <onboarding@resend.dev>";
pub const DEFAULT_SITE_URL: &str = "http://localhost:3000";
pub const DEFAULT_PORT: u16 = 3000;

/// How booking confirmations leave the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationTransport {
    /// Invoke the hosted confirmation function on the Supabase project.
    EdgeFunction,
    /// Send the email straight through the Resend API.
    Direct,
}

impl NotificationTransport {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "edge_function" | "edge-function" | "function" => Some(Self::EdgeFunction),
            "direct" | "resend" => Some(Self::Direct),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub supabase_jwt_secret: String,
    pub confirmation_function: String,
    pub notification_transport: NotificationTransport,
    pub resend_api_key: String,
    pub resend_base_url: String,
    pub email_from: String,
    pub site_url: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_anon_key: env::var("SUPABASE_ANON_PUBLIC_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_ANON_PUBLIC_KEY not set, using empty value");
                    String::new()
                }),
            supabase_jwt_secret: env::var("SUPABASE_JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_JWT_SECRET not set, using empty value");
                    String::new()
                }),
            confirmation_function: env::var("CONFIRMATION_FUNCTION")
                .unwrap_or_else(|_| DEFAULT_CONFIRMATION_FUNCTION.to_string()),
            notification_transport: match env::var("NOTIFICATION_TRANSPORT") {
                Ok(value) => NotificationTransport::parse(&value).unwrap_or_else(|| {
                    warn!("Unknown NOTIFICATION_TRANSPORT '{}', using edge_function", value);
                    NotificationTransport::EdgeFunction
                }),
                Err(_) => NotificationTransport::EdgeFunction,
            },
            resend_api_key: env::var("RESEND_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("RESEND_API_KEY not set, confirmation emails cannot be sent from this service");
                    String::new()
                }),
            resend_base_url: env::var("RESEND_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_RESEND_BASE_URL.to_string()),
            email_from: env::var("EMAIL_FROM")
                .unwrap_or_else(|_| DEFAULT_EMAIL_FROM.to_string()),
            site_url: env::var("SITE_URL")
                .unwrap_or_else(|_| {
                    warn!("SITE_URL not set, using default");
                    DEFAULT_SITE_URL.to_string()
                }),
            port: env::var("PORT")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(DEFAULT_PORT),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty()
            && !self.supabase_anon_key.is_empty()
            && !self.supabase_jwt_secret.is_empty()
    }

    pub fn is_email_configured(&self) -> bool {
        !self.resend_api_key.is_empty()
            && !self.resend_base_url.is_empty()
            && !self.email_from.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_transport_parse() {
        assert_eq!(NotificationTransport::parse("direct"), Some(NotificationTransport::Direct));
        assert_eq!(NotificationTransport::parse(" Edge_Function "), Some(NotificationTransport::EdgeFunction));
        assert_eq!(NotificationTransport::parse("carrier-pigeon"), None);
    }

    #[test]
    fn test_is_configured_requires_supabase_values() {
        let config = AppConfig {
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: String::new(),
            supabase_jwt_secret: "secret".to_string(),
            confirmation_function: DEFAULT_CONFIRMATION_FUNCTION.to_string(),
            notification_transport: NotificationTransport::EdgeFunction,
            resend_api_key: String::new(),
            resend_base_url: DEFAULT_RESEND_BASE_URL.to_string(),
            email_from: DEFAULT_EMAIL_FROM.to_string(),
            site_url: DEFAULT_SITE_URL.to_string(),
            port: DEFAULT_PORT,
        };

        assert!(!config.is_configured());
        assert!(!config.is_email_configured());
    }
}
