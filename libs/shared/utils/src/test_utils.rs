use std::sync::Arc;
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use base64::{Engine as _, engine::general_purpose};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::{
    AppConfig, NotificationTransport, DEFAULT_CONFIRMATION_FUNCTION, DEFAULT_EMAIL_FROM,
};
use shared_models::auth::{Session, User};

pub struct TestConfig {
    pub jwt_secret: String,
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub resend_api_key: String,
    pub resend_base_url: String,
    pub notification_transport: NotificationTransport,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
            resend_api_key: "re_test_key".to_string(),
            resend_base_url: "http://localhost:54322".to_string(),
            notification_transport: NotificationTransport::EdgeFunction,
        }
    }
}

impl TestConfig {
    /// Points both Supabase and Resend at one mock server.
    pub fn with_mock_server(uri: &str) -> Self {
        Self {
            supabase_url: uri.to_string(),
            resend_base_url: uri.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: self.supabase_anon_key.clone(),
            supabase_jwt_secret: self.jwt_secret.clone(),
            confirmation_function: DEFAULT_CONFIRMATION_FUNCTION.to_string(),
            notification_transport: self.notification_transport,
            resend_api_key: self.resend_api_key.clone(),
            resend_base_url: self.resend_base_url.clone(),
            email_from: DEFAULT_EMAIL_FROM.to_string(),
            site_url: "http://localhost:3000".to_string(),
            port: 3000,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestUser {
    pub id: String,
    pub email: String,
    pub role: String,
    pub name: Option<String>,
}

impl Default for TestUser {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: "test@example.com".to_string(),
            role: "authenticated".to_string(),
            name: None,
        }
    }
}

impl TestUser {
    pub fn new(email: &str, role: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            role: role.to_string(),
            name: None,
        }
    }

    pub fn patient(email: &str) -> Self {
        Self::new(email, "authenticated")
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    fn metadata(&self) -> Option<Value> {
        self.name.as_ref().map(|name| json!({ "name": name }))
    }

    pub fn to_user(&self) -> User {
        User {
            id: self.id.clone(),
            email: Some(self.email.clone()),
            role: Some(self.role.clone()),
            metadata: self.metadata(),
            created_at: Some(Utc::now()),
        }
    }

    pub fn to_session(&self, token: &str) -> Session {
        Session {
            user: self.to_user(),
            access_token: token.to_string(),
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str, exp_hours: Option<i64>) -> String {
        let now = Utc::now();
        let exp = now + Duration::hours(exp_hours.unwrap_or(24));

        let header = json!({
            "alg": "HS256",
            "typ": "JWT"
        });

        let mut payload = json!({
            "sub": user.id,
            "email": user.email,
            "role": user.role,
            "aud": "authenticated",
            "iat": now.timestamp(),
            "exp": exp.timestamp()
        });
        if let Some(metadata) = user.metadata() {
            payload["user_metadata"] = metadata;
        }

        let header_encoded = general_purpose::URL_SAFE_NO_PAD.encode(header.to_string());
        let payload_encoded = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());

        let signing_input = format!("{}.{}", header_encoded, payload_encoded);

        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();
        let signature_encoded = general_purpose::URL_SAFE_NO_PAD.encode(signature);

        format!("{}.{}", signing_input, signature_encoded)
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        Self::create_test_token(user, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        Self::create_test_token(user, "wrong-secret", Some(24))
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}

pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    pub fn auth_user_response(user: &TestUser) -> Value {
        json!({
            "id": user.id,
            "aud": "authenticated",
            "role": user.role,
            "email": user.email,
            "user_metadata": user.metadata().unwrap_or_else(|| json!({})),
            "created_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn session_response(user: &TestUser, access_token: &str) -> Value {
        json!({
            "access_token": access_token,
            "token_type": "bearer",
            "expires_in": 3600,
            "expires_at": Utc::now().timestamp() + 3600,
            "refresh_token": "refresh-token",
            "user": Self::auth_user_response(user)
        })
    }

    pub fn postgrest_error_response(message: &str, code: &str) -> Value {
        json!({
            "code": code,
            "details": null,
            "hint": null,
            "message": message
        })
    }

    pub fn gotrue_error_response(message: &str, error_code: &str, status: u16) -> Value {
        json!({
            "code": status,
            "error_code": error_code,
            "msg": message
        })
    }

    pub fn email_sent_response() -> Value {
        json!({
            "id": Uuid::new_v4()
        })
    }
}
