use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION},
    Method,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, error};

use shared_config::AppConfig;
use shared_models::auth::AuthSession;

use crate::error::SupabaseError;

pub type Result<T> = std::result::Result<T, SupabaseError>;

#[derive(Clone)]
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            anon_key: config.supabase_anon_key.clone(),
        }
    }

    fn get_headers(&self, auth_token: Option<&str>) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        headers.insert(
            "apikey",
            HeaderValue::from_str(&self.anon_key)
                .map_err(|_| SupabaseError::InvalidHeader("apikey".to_string()))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = auth_token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|_| SupabaseError::InvalidHeader("authorization".to_string()))?,
            );
        }

        Ok(headers)
    }

    /// Sends the request and returns the raw body of a 2xx response.
    async fn send(
        &self,
        method: Method,
        path: &str,
        auth_token: Option<&str>,
        body: Option<Value>,
        extra_headers: Option<HeaderMap>,
    ) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let mut headers = self.get_headers(auth_token)?;
        if let Some(extra) = extra_headers {
            headers.extend(extra);
        }

        let mut req = self.client.request(method, &url)
            .headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            error!("API error ({}): {}", status, text);
            return Err(SupabaseError::from_response(status.as_u16(), &text));
        }

        Ok(text)
    }

    pub async fn request<T>(&self, method: Method, path: &str,
                            auth_token: Option<&str>, body: Option<Value>)
                            -> Result<T>
    where T: DeserializeOwned {
        self.request_with_headers(method, path, auth_token, body, None).await
    }

    pub async fn request_with_headers<T>(&self, method: Method, path: &str,
                                         auth_token: Option<&str>, body: Option<Value>,
                                         extra_headers: Option<HeaderMap>)
                                         -> Result<T>
    where T: DeserializeOwned {
        let text = self.send(method, path, auth_token, body, extra_headers).await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Like `request`, for endpoints whose success body is empty or ignored.
    pub async fn execute(&self, method: Method, path: &str,
                         auth_token: Option<&str>, body: Option<Value>,
                         extra_headers: Option<HeaderMap>) -> Result<()> {
        self.send(method, path, auth_token, body, extra_headers).await?;
        Ok(())
    }

    /// Inserts one row into a PostgREST table without reading it back.
    pub async fn insert_row(&self, table: &str, auth_token: &str, row: Value) -> Result<()> {
        let path = format!("/rest/v1/{}", table);

        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=minimal"));

        self.execute(Method::POST, &path, Some(auth_token), Some(row), Some(headers)).await
    }

    /// Invokes a deployed edge function. An empty body comes back as `Null`
    /// and a non-JSON body as a string.
    pub async fn invoke_function(&self, name: &str, auth_token: &str, body: Value) -> Result<Value> {
        let path = format!("/functions/v1/{}", name);

        let text = self.send(Method::POST, &path, Some(auth_token), Some(body), None).await?;

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }

    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession> {
        self.request(
            Method::POST,
            "/auth/v1/token?grant_type=password",
            None,
            Some(json!({
                "email": email,
                "password": password
            })),
        ).await
    }

    pub async fn sign_up(&self, email: &str, password: &str,
                         data: Value, redirect_to: &str) -> Result<Value> {
        let path = format!(
            "/auth/v1/signup?redirect_to={}",
            urlencoding::encode(redirect_to)
        );

        self.request(
            Method::POST,
            &path,
            None,
            Some(json!({
                "email": email,
                "password": password,
                "data": data
            })),
        ).await
    }

    pub async fn sign_out(&self, auth_token: &str) -> Result<()> {
        self.execute(Method::POST, "/auth/v1/logout", Some(auth_token), None, None).await
    }
}
