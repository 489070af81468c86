use thiserror::Error;

/// Error type for opaque token and credential handling.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Malformed credential: {0}")]
    Malformed(&'static str),

    #[error("Unknown token scope: {0}")]
    UnknownScope(String),

    #[error("Random source unavailable: {0}")]
    RandomSource(String),
}
