use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use shared_database::SupabaseError;
use shared_models::auth::{AuthSession, CurrentUser};
use shared_models::error::AppError;

#[derive(Debug, Clone, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignUpRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Sign-up result. `session` is only present when the platform signs the
/// new user in straight away (no email confirmation step).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpResponse {
    pub message: String,
    pub user: Option<Value>,
    pub session: Option<AuthSession>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub user: Option<CurrentUser>,
}

#[derive(Error, Debug)]
pub enum AuthCellError {
    #[error("{0}")]
    Validation(String),

    /// Sign-ups are locked; carries the user-facing wait message.
    #[error("{0}")]
    SignUpLocked(String),

    #[error("Too many sign-ups from this network. Please wait 15-30 minutes and try again, or try using a different network connection.")]
    SignUpLimitReached,

    #[error("{0}")]
    Credentials(String),

    #[error(transparent)]
    Provider(#[from] SupabaseError),
}

impl From<AuthCellError> for AppError {
    fn from(err: AuthCellError) -> Self {
        match err {
            AuthCellError::Validation(msg) => AppError::ValidationError(msg),
            AuthCellError::SignUpLocked(msg) => AppError::RateLimited(msg),
            AuthCellError::SignUpLimitReached => AppError::RateLimited(err.to_string()),
            AuthCellError::Credentials(msg) => AppError::Auth(msg),
            AuthCellError::Provider(provider_err) => match provider_err {
                SupabaseError::Api { status: 429, message, .. } => AppError::RateLimited(message),
                SupabaseError::Api { status, message, .. } if (400..500).contains(&status) => {
                    AppError::BadRequest(message)
                }
                other => AppError::ExternalService(other.to_string()),
            },
        }
    }
}
