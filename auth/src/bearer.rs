use crate::token::OpaqueToken;
use crate::token::TokenError;

const BEARER_PREFIX: &str = "Bearer ";

/// Credential presented with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    /// No `Authorization` header at all.
    Anonymous,
    /// A well-formed bearer token. Not yet checked against storage.
    Bearer(OpaqueToken),
}

impl Credential {
    /// Interpret the raw `Authorization` header value.
    ///
    /// # Arguments
    /// * `header` - Header value, `None` when the header is absent
    ///
    /// # Errors
    /// * `Malformed` - Wrong scheme, empty token, or token failing the
    ///   length/charset check
    pub fn from_header(header: Option<&str>) -> Result<Self, TokenError> {
        let Some(value) = header else {
            return Ok(Credential::Anonymous);
        };

        let token = value
            .strip_prefix(BEARER_PREFIX)
            .ok_or(TokenError::Malformed("expected: Bearer <token>"))?
            .trim();

        OpaqueToken::parse(token).map(Credential::Bearer)
    }
}
