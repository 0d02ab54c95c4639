use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::models::AuthCellError;

pub const SIGNUP_LOCKOUT_MINUTES: i64 = 15;

/// Tracks the upstream sign-up email limit. The limit is enforced per
/// server address, so one lock covers every caller.
pub struct SignUpGuard {
    locked_at: RwLock<Option<DateTime<Utc>>>,
    window: Duration,
}

impl Default for SignUpGuard {
    fn default() -> Self {
        Self::new()
    }
}

pub fn wait_message(remaining_minutes: i64) -> String {
    format!(
        "Please wait approximately {} more minute{} before trying again.",
        remaining_minutes,
        if remaining_minutes == 1 { "" } else { "s" }
    )
}

impl SignUpGuard {
    pub fn new() -> Self {
        Self::with_window(Duration::minutes(SIGNUP_LOCKOUT_MINUTES))
    }

    pub fn with_window(window: Duration) -> Self {
        Self {
            locked_at: RwLock::new(None),
            window,
        }
    }

    pub async fn check(&self) -> Result<(), AuthCellError> {
        self.check_at(Utc::now()).await
    }

    /// Errors while the lock is active; clears it once the window has passed.
    pub async fn check_at(&self, now: DateTime<Utc>) -> Result<(), AuthCellError> {
        let Some(locked_at) = *self.locked_at.read().await else {
            return Ok(());
        };

        let elapsed = now - locked_at;
        if elapsed < self.window {
            let remaining_ms = (self.window - elapsed).num_milliseconds();
            let remaining_minutes = (remaining_ms + 59_999) / 60_000;
            warn!("Sign-up attempted during lockout, {} minute(s) left", remaining_minutes);
            return Err(AuthCellError::SignUpLocked(wait_message(remaining_minutes)));
        }

        let mut guard = self.locked_at.write().await;
        if *guard == Some(locked_at) {
            *guard = None;
            info!("Sign-up lockout cleared");
        }
        Ok(())
    }

    pub async fn trip(&self) {
        self.trip_at(Utc::now()).await
    }

    pub async fn trip_at(&self, now: DateTime<Utc>) {
        warn!("Sign-up email limit reached, locking sign-ups for {} minutes", self.window.num_minutes());
        *self.locked_at.write().await = Some(now);
    }

    pub async fn is_locked(&self) -> bool {
        self.locked_at.read().await.is_some()
    }
}
