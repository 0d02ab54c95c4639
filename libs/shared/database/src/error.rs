use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SupabaseError {
    /// Non-2xx from PostgREST, GoTrue or the functions gateway. `message` is
    /// the provider's own text.
    #[error("{message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl SupabaseError {
    /// Builds an `Api` error from a response body. PostgREST uses
    /// `message`/`code`, GoTrue uses `msg`/`error_code` or
    /// `error_description`/`error`.
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed: Option<Value> = serde_json::from_str(body).ok();

        let message = parsed
            .as_ref()
            .and_then(|value| {
                ["message", "msg", "error_description", "error"]
                    .iter()
                    .find_map(|key| value.get(*key).and_then(Value::as_str))
            })
            .map(str::to_string)
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    format!("Request failed with status {}", status)
                } else {
                    body.trim().to_string()
                }
            });

        let code = parsed.as_ref().and_then(|value| {
            ["error_code", "code"]
                .iter()
                .find_map(|key| value.get(*key).and_then(Value::as_str))
                .map(str::to_string)
        });

        SupabaseError::Api { status, code, message }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            SupabaseError::Api { status, .. } => Some(*status),
            SupabaseError::Http(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            SupabaseError::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    pub fn is_auth_error(&self) -> bool {
        matches!(self.status(), Some(400 | 401 | 403))
    }
}
