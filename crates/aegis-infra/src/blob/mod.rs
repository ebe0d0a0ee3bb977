//! Blob-storage adapters.

mod memory;

#[cfg(feature = "firestore")]
mod firebase;

pub use memory::MemoryBlobStore;

#[cfg(feature = "firestore")]
pub use firebase::FirebaseBlobStore;

/// Firebase Storage adapter configuration. Plain data: the adapter is
/// behind the `firestore` feature, the config is not.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub bucket: String,
    /// OAuth bearer token attached to uploads.
    pub auth_token: Option<String>,
}
