use thiserror::Error;

/// Error type for password operations.
///
/// A plaintext that simply does not match a stored hash is not an error;
/// see [`PasswordHasher::verify`](super::PasswordHasher::verify).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Stored password hash is malformed: {0}")]
    MalformedHash(String),

    #[error("Invalid hashing cost parameters: {0}")]
    InvalidCost(String),
}
