//! Email service for account confirmation messages.
//!
//! Messages are delivered through the log (`tracing`), which is the only
//! delivery channel this service carries. Recipient and subject are logged at
//! `info`; the body holds the confirmation token and is logged at `debug`.

use std::sync::Arc;
use tracing::{debug, info};

/// Email message to be sent.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    /// Recipient email address
    pub to: String,
    /// Recipient name
    pub to_name: String,
    /// Email subject
    pub subject: String,
    /// Plain text body
    pub body_text: String,
}

/// Email service for sending transactional emails.
#[derive(Debug, Clone)]
pub struct EmailService {
    base_url: Arc<str>,
}

impl EmailService {
    /// Creates a new EmailService that builds links against `base_url`.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: Arc::from(base_url.trim_end_matches('/')),
        }
    }

    /// Link the recipient follows to confirm their address.
    pub fn confirmation_url(&self, token: &str) -> String {
        format!("{}/api/v1/auth/confirmed_email/{}", self.base_url, token)
    }

    /// Builds the confirmation message for a freshly issued email token.
    pub fn confirmation_message(&self, to_email: &str, username: &str, token: &str) -> EmailMessage {
        let body_text = format!(
            r#"Hi {name},

Please confirm your email address by opening the link below:

{url}

This link will expire in 7 days.

If you didn't create a contacts account, you can safely ignore this email."#,
            name = username,
            url = self.confirmation_url(token)
        );

        EmailMessage {
            to: to_email.to_string(),
            to_name: username.to_string(),
            subject: "Confirm your email".to_string(),
            body_text,
        }
    }

    /// Send email confirmation email.
    pub async fn send_confirmation_email(&self, to_email: &str, username: &str, token: &str) {
        self.send(self.confirmation_message(to_email, username, token))
            .await
    }

    async fn send(&self, message: EmailMessage) {
        info!(
            to = %message.to,
            to_name = %message.to_name,
            subject = %message.subject,
            "Email (console delivery)"
        );
        // The body carries the confirmation token.
        debug!(body_text = %message.body_text, "Email body");
    }
}
