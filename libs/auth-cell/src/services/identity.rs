use std::sync::LazyLock;

use regex::Regex;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use shared_config::AppConfig;
use shared_database::{SupabaseClient, SupabaseError};
use shared_models::auth::AuthSession;

use crate::models::{AuthCellError, SignInRequest, SignUpRequest, SignUpResponse};
use crate::services::signup_guard::SignUpGuard;

pub const EMAIL_RATE_LIMIT_CODE: &str = "over_email_send_rate_limit";

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern is valid")
});

pub fn is_valid_email(email: &str) -> bool {
    email.len() <= 254 && EMAIL_PATTERN.is_match(email)
}

/// Checks a sign-up form; the first failing rule wins.
pub fn validate_sign_up(request: &SignUpRequest) -> Result<(), AuthCellError> {
    if request.name.trim().chars().count() < 2 {
        return Err(AuthCellError::Validation("Name must be at least 2 characters.".to_string()));
    }
    if !is_valid_email(request.email.trim()) {
        return Err(AuthCellError::Validation("Please enter a valid email address.".to_string()));
    }
    if request.password.chars().count() < 6 {
        return Err(AuthCellError::Validation("Password must be at least 6 characters.".to_string()));
    }
    if request.password != request.confirm_password {
        return Err(AuthCellError::Validation("Passwords don't match".to_string()));
    }
    Ok(())
}

/// Credential flows, delegated to the auth provider.
pub struct IdentityService {
    supabase: SupabaseClient,
    site_url: String,
    guard: SignUpGuard,
}

impl IdentityService {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_guard(config, SignUpGuard::new())
    }

    pub fn with_guard(config: &AppConfig, guard: SignUpGuard) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            site_url: config.site_url.clone(),
            guard,
        }
    }

    pub fn guard(&self) -> &SignUpGuard {
        &self.guard
    }

    pub async fn sign_in(&self, request: &SignInRequest) -> Result<AuthSession, AuthCellError> {
        debug!("Signing in {}", request.email);

        match self
            .supabase
            .sign_in_with_password(request.email.trim(), &request.password)
            .await
        {
            Ok(session) => {
                info!("User {} signed in", request.email);
                Ok(session)
            }
            Err(SupabaseError::Api { message, .. }) => {
                warn!("Sign in failed for {}: {}", request.email, message);
                Err(AuthCellError::Credentials(message))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<SignUpResponse, AuthCellError> {
        validate_sign_up(request)?;
        self.guard.check().await?;

        let email = request.email.trim();
        let created = self
            .supabase
            .sign_up(
                email,
                &request.password,
                json!({ "name": request.name.trim() }),
                &self.site_url,
            )
            .await;

        let body = match created {
            Ok(body) => body,
            Err(e) if e.code() == Some(EMAIL_RATE_LIMIT_CODE) => {
                self.guard.trip().await;
                return Err(AuthCellError::SignUpLimitReached);
            }
            Err(e) => {
                warn!("Sign up failed for {}: {}", email, e);
                return Err(e.into());
            }
        };

        info!("Account created for {}", email);
        Ok(sign_up_response(body))
    }

    pub async fn sign_out(&self, access_token: &str) -> Result<(), AuthCellError> {
        self.supabase.sign_out(access_token).await?;
        debug!("Session signed out");
        Ok(())
    }
}

/// The provider answers with a full session when it signs the user in
/// immediately, and with the bare user when confirmation is pending.
fn sign_up_response(body: Value) -> SignUpResponse {
    if body.get("access_token").is_some() {
        if let Ok(session) = serde_json::from_value::<AuthSession>(body.clone()) {
            return SignUpResponse {
                message: "Account created successfully!".to_string(),
                user: session.user.clone(),
                session: Some(session),
            };
        }
    }

    SignUpResponse {
        message: "Account created. Please check your email to confirm your address.".to_string(),
        user: body.get("id").is_some().then_some(body),
        session: None,
    }
}
