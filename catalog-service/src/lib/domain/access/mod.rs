pub mod authenticator;
pub mod authorizer;
pub mod errors;
pub mod models;
pub mod ports;

pub use authenticator::Authenticator;
pub use authorizer::Authorizer;
