pub mod identity;
pub mod signup_guard;

pub use identity::{is_valid_email, validate_sign_up, IdentityService};
pub use signup_guard::{wait_message, SignUpGuard, SIGNUP_LOCKOUT_MINUTES};
