use chrono::DateTime;
use chrono::Utc;

use crate::domain::token::models::IssuedToken;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;

/// Outgoing email, rendered by the mailer.
#[derive(Debug, Clone)]
pub struct Email {
    pub recipient: EmailAddress,
    pub template: EmailTemplate,
}

#[derive(Debug, Clone)]
pub enum EmailTemplate {
    /// Sent after registration, carries the first activation token.
    Welcome {
        user_id: UserId,
        activation_token: String,
    },
    /// Re-sent activation token.
    Activation {
        activation_token: String,
        expiry: DateTime<Utc>,
    },
    PasswordReset {
        reset_token: String,
        expiry: DateTime<Utc>,
    },
}

impl EmailTemplate {
    pub fn name(&self) -> &'static str {
        match self {
            EmailTemplate::Welcome { .. } => "user_welcome",
            EmailTemplate::Activation { .. } => "token_activation",
            EmailTemplate::PasswordReset { .. } => "token_password_reset",
        }
    }
}

impl Email {
    pub fn welcome(user: &User, token: &IssuedToken) -> Self {
        Self {
            recipient: user.email.clone(),
            template: EmailTemplate::Welcome {
                user_id: user.id,
                activation_token: token.plaintext().to_string(),
            },
        }
    }

    pub fn activation(user: &User, token: &IssuedToken) -> Self {
        Self {
            recipient: user.email.clone(),
            template: EmailTemplate::Activation {
                activation_token: token.plaintext().to_string(),
                expiry: token.expiry,
            },
        }
    }

    pub fn password_reset(user: &User, token: &IssuedToken) -> Self {
        Self {
            recipient: user.email.clone(),
            template: EmailTemplate::PasswordReset {
                reset_token: token.plaintext().to_string(),
                expiry: token.expiry,
            },
        }
    }
}
