use thiserror::Error;

/// Failure of a storage-bound operation.
///
/// Always a server-side fault from the client's point of view: the caller
/// maps both variants to an opaque 500 response.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Storage deadline exceeded during {0}")]
    Timeout(&'static str),

    #[error("Storage error: {0}")]
    Fault(String),
}
