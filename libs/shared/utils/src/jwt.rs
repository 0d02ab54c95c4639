use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{TimeZone, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;
use tracing::debug;

use shared_models::auth::{JwtClaims, User};

type HmacSha256 = Hmac<Sha256>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("JWT secret is not set")]
    MissingSecret,

    #[error("Invalid token format")]
    Malformed,

    #[error("Invalid signature encoding")]
    SignatureEncoding,

    #[error("Invalid token signature")]
    BadSignature,

    #[error("Invalid claims encoding")]
    ClaimsEncoding,

    #[error("Invalid claims format")]
    ClaimsFormat,

    #[error("Token expired")]
    Expired,
}

/// Verifies an HS256 Supabase access token and maps its claims to a `User`.
pub fn validate_token(token: &str, jwt_secret: &str) -> Result<User, TokenError> {
    if jwt_secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let mut parts = token.split('.');
    let (header_b64, claims_b64, signature_b64) =
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(header), Some(claims), Some(signature), None) => (header, claims, signature),
            _ => return Err(TokenError::Malformed),
        };

    let signature = URL_SAFE_NO_PAD.decode(signature_b64).map_err(|e| {
        debug!("Failed to decode signature: {}", e);
        TokenError::SignatureEncoding
    })?;

    let mut mac = HmacSha256::new_from_slice(jwt_secret.as_bytes())
        .map_err(|_| TokenError::MissingSecret)?;
    mac.update(format!("{}.{}", header_b64, claims_b64).as_bytes());

    if mac.verify_slice(&signature).is_err() {
        debug!("Token signature verification failed");
        return Err(TokenError::BadSignature);
    }

    let claims_bytes = URL_SAFE_NO_PAD
        .decode(claims_b64)
        .map_err(|_| TokenError::ClaimsEncoding)?;

    let claims: JwtClaims = serde_json::from_slice(&claims_bytes).map_err(|e| {
        debug!("Failed to parse claims: {}", e);
        TokenError::ClaimsFormat
    })?;

    if let Some(exp) = claims.exp {
        let now = Utc::now().timestamp() as u64;
        if exp < now {
            debug!("Token expired at {} (now: {})", exp, now);
            return Err(TokenError::Expired);
        }
    }

    let created_at = claims
        .iat
        .and_then(|timestamp| Utc.timestamp_opt(timestamp as i64, 0).single());

    let user = User {
        id: claims.sub,
        email: claims.email,
        role: claims.role,
        metadata: claims.user_metadata,
        created_at,
    };

    debug!("Token validated successfully for user: {}", user.id);
    Ok(user)
}
