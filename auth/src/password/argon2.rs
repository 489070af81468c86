use std::fmt;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::Error as PhcError;
use argon2::password_hash::PasswordHash as PhcHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;

use super::errors::PasswordError;

/// A salted Argon2id hash in PHC string format.
///
/// Can only be obtained from [`PasswordHasher::hash`] or by re-validating a
/// stored string with [`HashedPassword::from_stored`], so a user record can
/// never hold a missing or half-built hash. Deliberately has no `Display`
/// and a redacted `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// Rebuild a hash loaded from storage.
    ///
    /// # Errors
    /// * `MalformedHash` - The string is not a parsable PHC hash
    pub fn from_stored(phc: String) -> Result<Self, PasswordError> {
        PhcHash::new(&phc).map_err(|e| PasswordError::MalformedHash(e.to_string()))?;
        Ok(Self(phc))
    }

    /// PHC string for persistence.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HashedPassword([redacted])")
    }
}

/// Password hashing implementation.
///
/// Salted, cost-parameterized hashing (Argon2id). The default cost is the
/// `argon2` crate's recommended profile (19 MiB, 2 passes, 1 lane), which
/// costs tens of milliseconds per hash on server hardware.
#[derive(Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    /// Create a new password hasher with the default work factor.
    pub fn new() -> Self {
        Self {
            params: Params::default(),
        }
    }

    /// Create a hasher with an explicit work factor.
    ///
    /// # Arguments
    /// * `memory_kib` - Memory cost in KiB
    /// * `iterations` - Number of passes
    /// * `parallelism` - Number of lanes
    ///
    /// # Errors
    /// * `InvalidCost` - Parameters rejected by Argon2
    pub fn with_cost(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, PasswordError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| PasswordError::InvalidCost(e.to_string()))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a plaintext password with a fresh random salt.
    ///
    /// # Errors
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str) -> Result<HashedPassword, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| HashedPassword(hash.to_string()))
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// The cost parameters embedded in the stored hash are used, so hashes
    /// created under an older work factor keep verifying.
    ///
    /// # Returns
    /// `Ok(true)` on match, `Ok(false)` on mismatch
    ///
    /// # Errors
    /// * `MalformedHash` - The stored hash could not be parsed or evaluated
    pub fn verify(&self, password: &str, hash: &HashedPassword) -> Result<bool, PasswordError> {
        let parsed_hash =
            PhcHash::new(&hash.0).map_err(|e| PasswordError::MalformedHash(e.to_string()))?;

        match self
            .argon2()
            .verify_password(password.as_bytes(), &parsed_hash)
        {
            Ok(()) => Ok(true),
            Err(PhcError::Password) => Ok(false),
            Err(e) => Err(PasswordError::MalformedHash(e.to_string())),
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
