//! Blog-post service: CRUD, slug lookup, view counting, image upload.

use std::sync::Arc;

use chrono::Utc;
use serde_json::{Value, json};

use crate::domain::{BlogPatch, BlogPost, BlogPostCreate, BlogStatus};
use crate::error::{BlobError, StoreError};
use crate::ports::{BlobStore, DocumentStore};

const COLLECTION: &str = "blogs";
const ORDER_FIELD: &str = "createdAt";
const IMAGE_PREFIX: &str = "blog-images";

/// Service over the `blogs` collection and the image bucket.
#[derive(Clone)]
pub struct BlogService {
    store: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobStore>,
}

impl BlogService {
    pub fn new(store: Arc<dyn DocumentStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { store, blobs }
    }

    /// Store an image under `blog-images/{epoch-millis}_{file_name}` and
    /// return its public URL. Two uploads of an identically named file in
    /// the same millisecond collide; accepted, see DESIGN.md.
    pub async fn upload_image(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        content_type: &str,
    ) -> Result<String, BlobError> {
        let path = format!(
            "{}/{}_{}",
            IMAGE_PREFIX,
            Utc::now().timestamp_millis(),
            file_name
        );
        self.blobs.upload(&path, bytes, content_type).await
    }

    /// Create a post: `views` starts at zero, `createdAt`/`updatedAt` are
    /// stamped by the store, and `publishedAt` is stamped only when the
    /// post is born published (otherwise explicitly null).
    pub async fn create(&self, input: BlogPostCreate) -> Result<String, StoreError> {
        let status = input.status;
        let mut fields = input.into_fields();
        fields.insert("views".to_string(), json!(0));

        let mut stamps = vec!["createdAt", "updatedAt"];
        if status == BlogStatus::Published {
            stamps.push("publishedAt");
        } else {
            fields.insert("publishedAt".to_string(), Value::Null);
        }

        self.store.insert(COLLECTION, fields, &stamps).await
    }

    /// Every post, newest first, optionally filtered by status. The
    /// filter runs client-side over the full fetch, so no composite index
    /// is required of the backend.
    pub async fn list(&self, status: Option<BlogStatus>) -> Result<Vec<BlogPost>, StoreError> {
        let docs = self.store.fetch_all(COLLECTION, ORDER_FIELD).await?;
        let posts = docs.into_iter().map(BlogPost::from_document);
        Ok(match status {
            Some(wanted) => posts.filter(|post| post.status == wanted).collect(),
            None => posts.collect(),
        })
    }

    /// Lookup by id. Absence is a normal outcome, not an error.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<BlogPost>, StoreError> {
        let doc = self.store.fetch_one(COLLECTION, id).await?;
        Ok(doc.map(BlogPost::from_document))
    }

    /// Slug lookup via an equality query capped at one result. Slug
    /// uniqueness is not enforced by the store; with duplicates this
    /// returns an arbitrary one of them.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<BlogPost>, StoreError> {
        let docs = self
            .store
            .query_eq(COLLECTION, "slug", json!(slug), 1)
            .await?;
        Ok(docs.into_iter().next().map(BlogPost::from_document))
    }

    /// Atomic view-count bump, fired on reader click-through. Failures
    /// are logged and swallowed: a broken counter must never block the
    /// reader's navigation.
    pub async fn increment_view(&self, id: &str) {
        if let Err(err) = self.store.increment(COLLECTION, id, "views", 1).await {
            tracing::warn!(post_id = %id, error = %err, "View-count increment failed");
        }
    }

    /// Merge the patch and refresh `updatedAt`. Slug and excerpt are
    /// never re-derived here. A transition to published stamps
    /// `publishedAt` unless the stored post already carries one.
    pub async fn update(&self, id: &str, patch: BlogPatch) -> Result<(), StoreError> {
        let mut stamps = vec!["updatedAt"];
        if patch.status == Some(BlogStatus::Published) {
            let published_at = self.get_by_id(id).await?.and_then(|post| post.published_at);
            if published_at.is_none() {
                stamps.push("publishedAt");
            }
        }
        self.store
            .update_merge(COLLECTION, id, patch.into_fields(), &stamps)
            .await
    }

    /// Delete the document only. Cover and embedded images stay behind in
    /// blob storage.
    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.store.delete(COLLECTION, id).await
    }
}
