use async_trait::async_trait;

use crate::error::BlobError;

/// Blob storage port - binary assets (blog images) by path.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store a blob at `path` and return a publicly fetchable URL.
    /// Existing blobs at the same path are overwritten.
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, BlobError>;
}
