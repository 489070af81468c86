use std::fmt;
use std::str::FromStr;

use super::errors::TokenError;

/// Purpose class of a token. An operation only honours tokens of its own scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenScope {
    Activation,
    Authentication,
    PasswordReset,
}

impl TokenScope {
    /// Stable code stored alongside the token.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenScope::Activation => "activation",
            TokenScope::Authentication => "authentication",
            TokenScope::PasswordReset => "password-reset",
        }
    }
}

impl fmt::Display for TokenScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenScope {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "activation" => Ok(TokenScope::Activation),
            "authentication" => Ok(TokenScope::Authentication),
            "password-reset" => Ok(TokenScope::PasswordReset),
            other => Err(TokenError::UnknownScope(other.to_string())),
        }
    }
}
