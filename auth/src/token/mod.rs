pub mod errors;
pub mod opaque;
pub mod scope;

pub use errors::TokenError;
pub use opaque::OpaqueToken;
pub use opaque::TokenDigest;
pub use scope::TokenScope;
