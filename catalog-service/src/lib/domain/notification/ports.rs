use async_trait::async_trait;

use crate::domain::notification::errors::MailerError;
use crate::domain::notification::models::Email;

/// Outgoing mail delivery.
///
/// Called from background work, never on the response path.
#[async_trait]
pub trait Mailer: Send + Sync + 'static {
    /// Deliver one email.
    ///
    /// # Errors
    /// * `RenderFailed` - Template could not be rendered
    /// * `DeliveryFailed` - Transport rejected the message
    async fn send(&self, email: Email) -> Result<(), MailerError>;
}
