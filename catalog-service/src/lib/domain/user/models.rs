use std::fmt;
use std::str::FromStr;

use auth::HashedPassword;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::token::models::IssuedToken;
use crate::domain::user::errors::EmailError;
use crate::domain::user::errors::PasswordRuleError;
use crate::domain::user::errors::UserNameError;

/// User aggregate entity.
///
/// Created unactivated on registration. `version` fences concurrent updates
/// exactly like catalog records do.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub created_at: DateTime<Utc>,
    pub name: UserName,
    pub email: EmailAddress,
    pub password_hash: HashedPassword,
    pub activated: bool,
    pub version: i32,
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Display name value type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserName(String);

impl UserName {
    const MAX_LENGTH: usize = 500;

    /// Create a new valid user name.
    ///
    /// # Errors
    /// * `Empty` - Name is empty
    /// * `TooLong` - Name longer than 500 bytes
    pub fn new(name: String) -> Result<Self, UserNameError> {
        if name.is_empty() {
            Err(UserNameError::Empty)
        } else if name.len() > Self::MAX_LENGTH {
            Err(UserNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: name.len(),
            })
        } else {
            Ok(Self(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password that passed the length rules.
///
/// Only lives long enough to be hashed; `Debug` never prints it.
#[derive(Clone)]
pub struct Password(String);

impl Password {
    const MIN_LENGTH: usize = 8;
    const MAX_LENGTH: usize = 72;

    /// # Errors
    /// * `TooShort` - Fewer than 8 bytes
    /// * `TooLong` - More than 72 bytes
    pub fn new(password: String) -> Result<Self, PasswordRuleError> {
        if password.len() < Self::MIN_LENGTH {
            Err(PasswordRuleError::TooShort {
                min: Self::MIN_LENGTH,
            })
        } else if password.len() > Self::MAX_LENGTH {
            Err(PasswordRuleError::TooLong {
                max: Self::MAX_LENGTH,
            })
        } else {
            Ok(Self(password))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password([redacted])")
    }
}

/// User row to insert. The store assigns `id`, `created_at` and `version`.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: UserName,
    pub email: EmailAddress,
    pub password_hash: HashedPassword,
}

/// Command to register a new user with domain types
#[derive(Debug)]
pub struct RegisterUserCommand {
    pub name: UserName,
    pub email: EmailAddress,
    pub password: Password,
}

impl RegisterUserCommand {
    pub fn new(name: UserName, email: EmailAddress, password: Password) -> Self {
        Self {
            name,
            email,
            password,
        }
    }
}

/// A user together with a freshly issued token that must reach them by email.
#[derive(Debug, Clone)]
pub struct UserWithToken {
    pub user: User,
    pub token: IssuedToken,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_name_rules() {
        assert_eq!(UserName::new(String::new()), Err(UserNameError::Empty));
        assert!(matches!(
            UserName::new("x".repeat(501)),
            Err(UserNameError::TooLong { max: 500, .. })
        ));
        assert!(UserName::new("Alice Smith".to_string()).is_ok());
    }

    #[test]
    fn test_email_rules() {
        assert!(EmailAddress::new("alice@example.com".to_string()).is_ok());
        assert!(EmailAddress::new("not-an-email".to_string()).is_err());
    }

    #[test]
    fn test_password_rules() {
        assert!(matches!(
            Password::new("short".to_string()),
            Err(PasswordRuleError::TooShort { min: 8 })
        ));
        assert!(matches!(
            Password::new("p".repeat(73)),
            Err(PasswordRuleError::TooLong { max: 72 })
        ));
        assert!(Password::new("pa55word".to_string()).is_ok());
    }

    #[test]
    fn test_password_debug_is_redacted() {
        let password = Password::new("pa55word!".to_string()).unwrap();
        assert_eq!(format!("{:?}", password), "Password([redacted])");
    }
}
