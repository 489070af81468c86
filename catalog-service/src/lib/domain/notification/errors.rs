use thiserror::Error;

/// Error for outgoing mail delivery
#[derive(Debug, Clone, Error)]
pub enum MailerError {
    #[error("Failed to render email template {template}: {reason}")]
    RenderFailed {
        template: &'static str,
        reason: String,
    },

    #[error("Failed to deliver email: {0}")]
    DeliveryFailed(String),
}
