//! In-memory blob store - fallback and test double.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use aegis_core::error::BlobError;
use aegis_core::ports::BlobStore;

struct StoredBlob {
    bytes: Vec<u8>,
    content_type: String,
}

/// Keeps uploads in a map and hands back `memory://` URLs. Data is lost
/// on process restart.
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, StoredBlob>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self {
            blobs: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get(&self, path: &str) -> Option<Vec<u8>> {
        let blobs = self.blobs.read().await;
        blobs.get(path).map(|blob| blob.bytes.clone())
    }

    pub async fn content_type(&self, path: &str) -> Option<String> {
        let blobs = self.blobs.read().await;
        blobs.get(path).map(|blob| blob.content_type.clone())
    }
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, BlobError> {
        let mut blobs = self.blobs.write().await;
        blobs.insert(
            path.to_string(),
            StoredBlob {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(format!("memory://{path}"))
    }
}
