use std::fmt;

use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Digest;
use sha2::Sha256;

use super::errors::TokenError;

/// RFC 4648 base-32 alphabet, emitted without padding.
const BASE32_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// Random bytes per token (128 bits of entropy).
const TOKEN_BYTES: usize = 16;

/// Encoded length of [`TOKEN_BYTES`] in unpadded base-32.
pub const TOKEN_LENGTH: usize = 26;

fn base32_encode(data: &[u8]) -> String {
    let mut result = String::with_capacity(TOKEN_LENGTH);
    let mut bits = 0u32;
    let mut bit_count = 0u8;

    for &byte in data {
        bits = (bits << 8) | (byte as u32);
        bit_count += 8;

        while bit_count >= 5 {
            bit_count -= 5;
            let index = ((bits >> bit_count) & 0x1F) as usize;
            result.push(BASE32_ALPHABET[index] as char);
        }
    }

    if bit_count > 0 {
        let index = ((bits << (5 - bit_count)) & 0x1F) as usize;
        result.push(BASE32_ALPHABET[index] as char);
    }

    result
}

/// Plaintext bearer token.
///
/// Handed to its owner exactly once at issuance; only its [`TokenDigest`] is
/// ever persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct OpaqueToken(String);

impl OpaqueToken {
    /// Draw a new token from the operating system CSPRNG.
    ///
    /// # Errors
    /// * `RandomSource` - The OS random source failed
    pub fn generate() -> Result<Self, TokenError> {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| TokenError::RandomSource(e.to_string()))?;
        Ok(Self(base32_encode(&bytes)))
    }

    /// Sanity-check a presented token before any storage lookup.
    ///
    /// # Errors
    /// * `Malformed` - Wrong length or characters outside the base-32 alphabet
    pub fn parse(candidate: &str) -> Result<Self, TokenError> {
        if candidate.is_empty() {
            return Err(TokenError::Malformed("token must be provided"));
        }
        if candidate.len() != TOKEN_LENGTH {
            return Err(TokenError::Malformed("token must be 26 bytes long"));
        }
        if !candidate.bytes().all(|b| BASE32_ALPHABET.contains(&b)) {
            return Err(TokenError::Malformed("token contains invalid characters"));
        }
        Ok(Self(candidate.to_string()))
    }

    /// Lookup digest for this token.
    pub fn digest(&self) -> TokenDigest {
        TokenDigest::of(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for OpaqueToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OpaqueToken([redacted])")
    }
}

/// SHA-256 digest of a token plaintext, used as the storage lookup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenDigest([u8; 32]);

impl TokenDigest {
    pub fn of(plaintext: &str) -> Self {
        Self(Sha256::digest(plaintext.as_bytes()).into())
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_generated_token_shape() {
        let token = OpaqueToken::generate().unwrap();
        assert_eq!(token.as_str().len(), TOKEN_LENGTH);
        assert!(OpaqueToken::parse(token.as_str()).is_ok());
    }

    #[test]
    fn test_tokens_are_unique() {
        let tokens: HashSet<String> = (0..10_000)
            .map(|_| OpaqueToken::generate().unwrap().into_string())
            .collect();
        assert_eq!(tokens.len(), 10_000);
    }

    #[test]
    fn test_digest_is_deterministic_and_not_plaintext() {
        let token = OpaqueToken::generate().unwrap();
        assert_eq!(token.digest(), TokenDigest::of(token.as_str()));
        assert_ne!(token.digest().as_bytes().as_slice(), token.as_str().as_bytes());
    }

    #[test]
    fn test_base32_known_vector() {
        // RFC 4648 section 10: BASE32("foobar") = "MZXW6YTBOI======"
        assert_eq!(base32_encode(b"foobar"), "MZXW6YTBOI");
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(
            OpaqueToken::parse(""),
            Err(TokenError::Malformed("token must be provided"))
        );
        assert!(OpaqueToken::parse("ABC").is_err());
        assert!(OpaqueToken::parse("abcdefghijklmnopqrstuvwxyz").is_err());
        assert!(OpaqueToken::parse("ABCDEFGHIJKLMNOPQRSTUVWXY1").is_err());
        assert!(OpaqueToken::parse("ABCDEFGHIJKLMNOPQRSTUVWXYZ").is_ok());
    }
}
