//! Application state - shared across all handlers.

use std::sync::Arc;

use aegis_core::domain::AllowList;
use aegis_core::ports::{BlobStore, DocumentStore};
use aegis_core::services::{BlogService, ContactService, DashboardService};
use aegis_infra::{MemoryBlobStore, MemoryDocumentStore};

use crate::config::AppConfig;

/// Shared application state: the three content services plus the admin
/// allow-list.
#[derive(Clone)]
pub struct AppState {
    pub contacts: ContactService,
    pub blogs: BlogService,
    pub dashboard: DashboardService,
    pub allow_list: AllowList,
}

impl AppState {
    /// Wire the services to the configured backends, falling back to the
    /// in-memory stores when the remote backend is not configured.
    pub fn new(config: &AppConfig) -> Self {
        let store = document_store(config);
        let blobs = blob_store(config);

        Self {
            contacts: ContactService::new(Arc::clone(&store)),
            blogs: BlogService::new(Arc::clone(&store), blobs),
            dashboard: DashboardService::new(store),
            allow_list: config.allow_list.clone(),
        }
    }
}

#[cfg(feature = "firestore")]
fn document_store(config: &AppConfig) -> Arc<dyn DocumentStore> {
    match &config.firestore {
        Some(firestore) => {
            tracing::info!(project_id = %firestore.project_id, "Using the Firestore document store");
            Arc::new(aegis_infra::FirestoreStore::new(firestore.clone()))
        }
        None => {
            tracing::warn!(
                "FIREBASE_PROJECT_ID not set; falling back to the in-memory document store"
            );
            Arc::new(MemoryDocumentStore::new())
        }
    }
}

#[cfg(not(feature = "firestore"))]
fn document_store(_config: &AppConfig) -> Arc<dyn DocumentStore> {
    tracing::info!("Built without the firestore feature; using the in-memory document store");
    Arc::new(MemoryDocumentStore::new())
}

#[cfg(feature = "firestore")]
fn blob_store(config: &AppConfig) -> Arc<dyn BlobStore> {
    match &config.storage {
        Some(storage) => {
            tracing::info!(bucket = %storage.bucket, "Using the Firebase Storage blob store");
            Arc::new(aegis_infra::FirebaseBlobStore::new(storage.clone()))
        }
        None => {
            tracing::warn!(
                "FIREBASE_STORAGE_BUCKET not set; falling back to the in-memory blob store"
            );
            Arc::new(MemoryBlobStore::new())
        }
    }
}

#[cfg(not(feature = "firestore"))]
fn blob_store(_config: &AppConfig) -> Arc<dyn BlobStore> {
    Arc::new(MemoryBlobStore::new())
}
