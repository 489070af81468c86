//! Authentication utilities library
//!
//! Credential primitives shared by the API services:
//! - Password hashing (Argon2id)
//! - Opaque bearer token generation and digesting
//! - `Authorization` header parsing
//!
//! Nothing in here touches storage. Services persist digests and hashes
//! through their own ports.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! assert!(!hasher.verify("not_my_password", &hash).unwrap());
//! ```
//!
//! ## Opaque Tokens
//! ```
//! use auth::{Credential, OpaqueToken, TokenDigest};
//!
//! let token = OpaqueToken::generate().unwrap();
//! let stored = token.digest();
//!
//! let header = format!("Bearer {}", token.as_str());
//! match Credential::from_header(Some(&header)).unwrap() {
//!     Credential::Bearer(presented) => assert_eq!(presented.digest(), stored),
//!     Credential::Anonymous => unreachable!(),
//! }
//! assert_eq!(TokenDigest::of(token.as_str()), stored);
//! ```

pub mod bearer;
pub mod password;
pub mod token;

// Re-export commonly used items
pub use bearer::Credential;
pub use password::HashedPassword;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::OpaqueToken;
pub use token::TokenDigest;
pub use token::TokenError;
pub use token::TokenScope;
