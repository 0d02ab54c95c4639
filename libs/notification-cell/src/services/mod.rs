pub mod mailer;
pub mod notifier;
pub mod template;

pub use mailer::ResendMailer;
pub use notifier::{notifier_from_config, ConfirmationNotifier, EdgeFunctionNotifier, EmailNotifier};
pub use template::{confirmation_email, render_confirmation_html};
