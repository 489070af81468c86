use thiserror::Error;

use crate::domain::errors::StorageError;
use crate::domain::token::errors::TokenServiceError;

/// Error for UserName validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserNameError {
    #[error("must be provided")]
    Empty,

    #[error("must not be more than {max} bytes long, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("must be a valid email address: {0}")]
    InvalidFormat(String),
}

/// Error for plaintext password rule failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordRuleError {
    #[error("must be at least {min} bytes long")]
    TooShort { min: usize },

    #[error("must not be more than {max} bytes long")]
    TooLong { max: usize },
}

/// Top-level error for all user-related operations
#[derive(Debug, Clone, Error)]
pub enum UserError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid name: {0}")]
    InvalidName(#[from] UserNameError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Invalid password: {0}")]
    InvalidPassword(#[from] PasswordRuleError),

    // Domain-level errors
    #[error("A user with this email address already exists")]
    DuplicateEmail,

    #[error("No matching email address found")]
    EmailNotFound,

    #[error("Invalid authentication credentials")]
    InvalidCredentials,

    #[error("Invalid or expired {0} token")]
    InvalidToken(auth::TokenScope),

    #[error("User has already been activated")]
    AlreadyActivated,

    #[error("User account must be activated")]
    NotActivated,

    #[error("Unable to update the record due to an edit conflict, please try again")]
    EditConflict,

    // Infrastructure errors
    #[error("Password hashing error: {0}")]
    Password(#[from] auth::PasswordError),

    #[error("Token error: {0}")]
    Token(#[from] TokenServiceError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
