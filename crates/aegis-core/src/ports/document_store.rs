use std::fmt;
use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::error::StoreError;

/// A raw document: the store-assigned id plus its fields as plain JSON.
/// Adapters normalize their wire formats into this shape; the entity
/// decoders in `domain` take it from there.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Map<String, Value>,
}

/// Callback invoked with the full, re-sorted result set of a watched
/// collection on every change.
pub type WatchHandler =
    Box<dyn Fn(Vec<Document>) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

/// Detaches a standing watch when dropped or explicitly detached.
///
/// The owner must keep the guard alive for as long as it wants deliveries
/// and drop it on teardown; a guard that is never dropped leaks the
/// subscription for the lifetime of the process.
pub struct WatchGuard {
    detach: Option<Box<dyn FnOnce() + Send>>,
}

impl WatchGuard {
    pub fn new(detach: impl FnOnce() + Send + 'static) -> Self {
        Self {
            detach: Some(Box::new(detach)),
        }
    }

    /// Detach now instead of at drop time.
    pub fn detach(mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl Drop for WatchGuard {
    fn drop(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl fmt::Debug for WatchGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchGuard")
            .field("attached", &self.detach.is_some())
            .finish()
    }
}

/// Document store port - collection/document operations against the
/// remote backend. The operation set is exactly what the content
/// services need; ordering is always descending on one named field.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert with a store-assigned id. Fields named in
    /// `server_timestamps` are set from the store's clock at write time.
    async fn insert(
        &self,
        collection: &str,
        fields: Map<String, Value>,
        server_timestamps: &[&str],
    ) -> Result<String, StoreError>;

    /// Every document, ordered descending by `order_field`.
    async fn fetch_all(
        &self,
        collection: &str,
        order_field: &str,
    ) -> Result<Vec<Document>, StoreError>;

    /// One document by id. Absent documents are `None`, not an error.
    async fn fetch_one(&self, collection: &str, id: &str)
    -> Result<Option<Document>, StoreError>;

    /// Equality query, capped at `limit` results.
    async fn query_eq(
        &self,
        collection: &str,
        field: &str,
        value: Value,
        limit: u32,
    ) -> Result<Vec<Document>, StoreError>;

    /// Documents whose `field` timestamp is at or after `since`, ordered
    /// descending by that field.
    async fn fetch_since(
        &self,
        collection: &str,
        field: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<Document>, StoreError>;

    /// Merge `patch` into an existing document, preserving untouched
    /// fields. Fields named in `server_timestamps` are set from the
    /// store's clock. Fails with `StoreError::NotFound` for absent ids.
    async fn update_merge(
        &self,
        collection: &str,
        id: &str,
        patch: Map<String, Value>,
        server_timestamps: &[&str],
    ) -> Result<(), StoreError>;

    /// Atomic numeric increment. A missing field counts from zero, so
    /// concurrent bumps never lose updates.
    async fn increment(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        delta: i64,
    ) -> Result<(), StoreError>;

    /// Hard delete. Deleting an absent document is not an error.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    /// Standing query: `handler` receives the full result set (descending
    /// by `order_field`) immediately and again after every change, until
    /// the returned guard is dropped or detached.
    async fn watch(
        &self,
        collection: &str,
        order_field: &str,
        handler: WatchHandler,
    ) -> Result<WatchGuard, StoreError>;
}
