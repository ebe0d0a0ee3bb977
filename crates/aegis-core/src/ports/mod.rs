//! Ports - trait definitions for the remote backends.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod blob_store;
mod document_store;

pub use auth::{TokenClaims, TokenService};
pub use blob_store::BlobStore;
pub use document_store::{Document, DocumentStore, WatchGuard, WatchHandler};
