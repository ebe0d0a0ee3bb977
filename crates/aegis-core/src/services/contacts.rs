//! Contact-submission service: create, list, realtime feed, delete.

use std::sync::Arc;

use crate::domain::{ContactSubmission, ContactSubmissionCreate};
use crate::error::StoreError;
use crate::ports::{Document, DocumentStore, WatchGuard};

const COLLECTION: &str = "contact_submissions";
const ORDER_FIELD: &str = "created_at";

/// Service over the `contact_submissions` collection.
#[derive(Clone)]
pub struct ContactService {
    store: Arc<dyn DocumentStore>,
}

impl ContactService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Insert one submission and return its id. `created_at` and
    /// `updated_at` are stamped by the store. Input validation happens at
    /// the form boundary before this is called.
    pub async fn create(&self, input: ContactSubmissionCreate) -> Result<String, StoreError> {
        self.store
            .insert(COLLECTION, input.into_fields(), &["created_at", "updated_at"])
            .await
    }

    /// All submissions, newest first.
    pub async fn list(&self) -> Result<Vec<ContactSubmission>, StoreError> {
        let docs = self.store.fetch_all(COLLECTION, ORDER_FIELD).await?;
        Ok(decode(docs))
    }

    /// Standing feed: `handler` receives the full re-sorted submission
    /// list immediately and after every insert or delete. Drop or detach
    /// the guard to tear the listener down; holding it forever leaks the
    /// subscription.
    pub async fn subscribe<F>(&self, handler: F) -> Result<WatchGuard, StoreError>
    where
        F: Fn(Vec<ContactSubmission>) + Send + Sync + 'static,
    {
        let handler = Arc::new(handler);
        self.store
            .watch(
                COLLECTION,
                ORDER_FIELD,
                Box::new(move |docs| {
                    let handler = Arc::clone(&handler);
                    Box::pin(async move { handler(decode(docs)) })
                }),
            )
            .await
    }

    /// Hard delete. Submissions have no soft-delete state.
    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.store.delete(COLLECTION, id).await
    }
}

fn decode(docs: Vec<Document>) -> Vec<ContactSubmission> {
    docs.into_iter()
        .map(ContactSubmission::from_document)
        .collect()
}
