use auth::OpaqueToken;
use auth::TokenDigest;
use auth::TokenScope;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::domain::user::models::UserId;

/// How long a freshly issued token of each scope stays valid.
pub fn default_ttl(scope: TokenScope) -> Duration {
    match scope {
        TokenScope::Activation => Duration::days(3),
        TokenScope::Authentication => Duration::hours(24),
        TokenScope::PasswordReset => Duration::minutes(45),
    }
}

/// Persisted form of a token. Holds the digest, never the plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRecord {
    pub digest: TokenDigest,
    pub user_id: UserId,
    pub expiry: DateTime<Utc>,
    pub scope: TokenScope,
}

/// Token returned to the caller at issuance. The only place the plaintext
/// exists; once dropped it cannot be recovered, only re-issued.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: OpaqueToken,
    pub user_id: UserId,
    pub expiry: DateTime<Utc>,
    pub scope: TokenScope,
}

impl IssuedToken {
    pub fn plaintext(&self) -> &str {
        self.token.as_str()
    }
}
