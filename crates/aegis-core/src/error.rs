//! Domain-level error types.

use thiserror::Error;

/// Document-store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Backend connection failed: {0}")]
    Connection(String),

    #[error("Request failed: {0}")]
    Query(String),

    #[error("Document not found")]
    NotFound,

    #[error("Malformed document: {0}")]
    Decode(String),
}

/// Blob-storage errors.
#[derive(Debug, Error)]
pub enum BlobError {
    #[error("Backend connection failed: {0}")]
    Connection(String),

    #[error("Upload failed: {0}")]
    Upload(String),
}

/// Authentication and authorization errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing authentication")]
    MissingAuth,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Insufficient permissions")]
    InsufficientPermissions,
}
