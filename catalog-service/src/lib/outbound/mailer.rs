use async_trait::async_trait;

use crate::domain::notification::errors::MailerError;
use crate::domain::notification::models::Email;
use crate::domain::notification::models::EmailTemplate;
use crate::domain::notification::ports::Mailer;

/// Mailer that writes each message to the log instead of an SMTP relay.
///
/// Bodies carry live tokens and are only emitted at debug level.
#[derive(Debug, Clone)]
pub struct LogMailer {
    sender: String,
}

impl LogMailer {
    pub fn new(sender: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
        }
    }
}

/// Subject and plain-text body for a template.
pub fn render(template: &EmailTemplate) -> (String, String) {
    match template {
        EmailTemplate::Welcome {
            user_id,
            activation_token,
        } => (
            "Welcome to Greenlight!".to_string(),
            format!(
                "Thanks for signing up. Your user ID number is {}.\n\n\
                 Please send a request to PUT /v1/users/activated with the following \
                 JSON body to activate your account:\n\n\
                 {{\"token\": \"{}\"}}\n\n\
                 This is a one-time use token and it will expire in 3 days.",
                user_id, activation_token
            ),
        ),
        EmailTemplate::Activation {
            activation_token,
            expiry,
        } => (
            "Activate your Greenlight account".to_string(),
            format!(
                "Please send a request to PUT /v1/users/activated with the following \
                 JSON body to activate your account:\n\n\
                 {{\"token\": \"{}\"}}\n\n\
                 This is a one-time use token and it will expire at {}.",
                activation_token,
                expiry.to_rfc3339()
            ),
        ),
        EmailTemplate::PasswordReset {
            reset_token,
            expiry,
        } => (
            "Reset your Greenlight password".to_string(),
            format!(
                "Please send a request to PUT /v1/users/password with the following \
                 JSON body to set a new password:\n\n\
                 {{\"password\": \"your new password\", \"token\": \"{}\"}}\n\n\
                 This is a one-time use token and it will expire at {}.",
                reset_token,
                expiry.to_rfc3339()
            ),
        ),
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: Email) -> Result<(), MailerError> {
        let (subject, body) = render(&email.template);

        tracing::info!(
            from = %self.sender,
            recipient = %email.recipient,
            template = email.template.name(),
            subject = %subject,
            "Email sent"
        );
        tracing::debug!(recipient = %email.recipient, body = %body, "Email body");

        Ok(())
    }
}
