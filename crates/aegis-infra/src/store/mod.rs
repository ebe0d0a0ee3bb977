//! Document-store adapters.

mod memory;

#[cfg(feature = "firestore")]
pub mod firestore;

pub use memory::MemoryDocumentStore;

#[cfg(feature = "firestore")]
pub use firestore::FirestoreStore;

use std::time::Duration;

/// Firestore adapter configuration. Plain data: the adapter itself is
/// behind the `firestore` feature, the config is not, so binaries can
/// parse their environment unconditionally.
#[derive(Debug, Clone)]
pub struct FirestoreConfig {
    pub project_id: String,
    /// OAuth bearer token attached to every request. Unauthenticated
    /// access only works against the emulator or open security rules.
    pub auth_token: Option<String>,
    /// Poll interval for `watch`: the REST surface has no listen channel.
    pub poll_interval: Duration,
}

impl FirestoreConfig {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            auth_token: None,
            poll_interval: Duration::from_secs(5),
        }
    }
}
