use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtHeader {
    pub alg: String,
    pub typ: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub exp: Option<u64>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub app_metadata: Option<serde_json::Value>,
    pub user_metadata: Option<serde_json::Value>,
    pub aud: Option<String>,
    pub iat: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: Option<String>,
    pub role: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// Name used when addressing the patient: profile `name`, then the local
    /// part of the email, then "Patient".
    pub fn display_name(&self) -> String {
        let from_metadata = self
            .metadata
            .as_ref()
            .and_then(|metadata| metadata.get("name"))
            .and_then(|name| name.as_str())
            .map(str::trim)
            .filter(|name| !name.is_empty());

        if let Some(name) = from_metadata {
            return name.to_string();
        }

        self.email
            .as_deref()
            .and_then(|email| email.split('@').next())
            .filter(|local| !local.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| "Patient".to_string())
    }
}

/// Verified bearer session for the current request.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub access_token: String,
}

/// Public view of the signed-in user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentUser {
    pub id: String,
    pub email: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            metadata: user.metadata.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub valid: bool,
    pub user_id: String,
    pub email: Option<String>,
    pub role: Option<String>,
}

/// Session payload returned by the Supabase password grant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub token_type: Option<String>,
    pub expires_in: Option<i64>,
    pub expires_at: Option<i64>,
    pub refresh_token: Option<String>,
    pub user: Option<serde_json::Value>,
}
