//! Content-service behavior over the in-memory store: the contracts the
//! HTTP surface and the admin console rely on.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tokio::sync::mpsc;
use tokio::time::timeout;

use aegis_core::domain::{
    BlogAuthor, BlogPatch, BlogPostCreate, BlogSeo, BlogStatus, ContactSubmissionCreate,
};
use aegis_core::error::StoreError;
use aegis_core::ports::{Document, DocumentStore, WatchGuard, WatchHandler};
use aegis_core::services::{BlogService, ContactService, DashboardService};
use aegis_infra::{MemoryBlobStore, MemoryDocumentStore};

fn contact_service(store: &Arc<MemoryDocumentStore>) -> ContactService {
    ContactService::new(Arc::clone(store) as Arc<dyn DocumentStore>)
}

fn blog_service(store: &Arc<MemoryDocumentStore>) -> BlogService {
    BlogService::new(
        Arc::clone(store) as Arc<dyn DocumentStore>,
        Arc::new(MemoryBlobStore::new()),
    )
}

fn submission(name: &str, email: &str, message: &str) -> ContactSubmissionCreate {
    ContactSubmissionCreate {
        name: name.to_string(),
        company: String::new(),
        email: email.to_string(),
        phone: String::new(),
        message: message.to_string(),
    }
}

fn post(title: &str, slug: &str, status: BlogStatus) -> BlogPostCreate {
    BlogPostCreate {
        title: title.to_string(),
        slug: slug.to_string(),
        excerpt: "excerpt".to_string(),
        content: "<p>content</p>".to_string(),
        cover_image: String::new(),
        tags: vec![],
        categories: vec![],
        status,
        author: BlogAuthor::default(),
        seo: BlogSeo::default(),
        scheduled_date: None,
    }
}

#[tokio::test]
async fn contact_create_then_list_round_trips() {
    let store = Arc::new(MemoryDocumentStore::new());
    let contacts = contact_service(&store);

    let id = contacts
        .create(submission("A", "a@x.com", "hi"))
        .await
        .unwrap();

    let listed = contacts.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    let row = &listed[0];
    assert_eq!(row.id, id);
    assert_eq!(row.name, "A");
    assert_eq!(row.email, "a@x.com");
    assert_eq!(row.message, "hi");
    // Both server-assigned timestamps are present and parseable.
    assert!(row.created_at.is_some());
    assert!(row.updated_at.is_some());
}

#[tokio::test]
async fn contact_list_is_newest_first() {
    let store = Arc::new(MemoryDocumentStore::new());
    let contacts = contact_service(&store);

    contacts
        .create(submission("first", "a@x.com", "hi"))
        .await
        .unwrap();
    contacts
        .create(submission("second", "b@x.com", "hi"))
        .await
        .unwrap();

    let listed = contacts.list().await.unwrap();
    assert_eq!(listed[0].name, "second");
    assert_eq!(listed[1].name, "first");
}

#[tokio::test]
async fn contact_delete_removes_the_row() {
    let store = Arc::new(MemoryDocumentStore::new());
    let contacts = contact_service(&store);

    let id = contacts
        .create(submission("A", "a@x.com", "hi"))
        .await
        .unwrap();
    contacts.delete(&id).await.unwrap();

    assert!(contacts.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn contact_feed_delivers_snapshot_and_changes_until_detached() {
    let store = Arc::new(MemoryDocumentStore::new());
    let contacts = contact_service(&store);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let guard = contacts
        .subscribe(move |rows| {
            let _ = tx.send(rows);
        })
        .await
        .unwrap();

    let initial = timeout(Duration::from_secs(1), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert!(initial.is_empty());

    contacts
        .create(submission("A", "a@x.com", "hi"))
        .await
        .unwrap();
    let update = timeout(Duration::from_secs(1), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(update.len(), 1);
    assert_eq!(update[0].name, "A");

    guard.detach();
    contacts
        .create(submission("B", "b@x.com", "hi"))
        .await
        .unwrap();
    let silence = timeout(Duration::from_millis(200), rx.recv()).await;
    assert!(matches!(silence, Err(_) | Ok(None)));
}

#[tokio::test]
async fn blog_create_draft_has_no_published_at() {
    let store = Arc::new(MemoryDocumentStore::new());
    let blogs = blog_service(&store);

    let id = blogs.create(post("Hello", "hello", BlogStatus::Draft)).await.unwrap();
    let created = blogs.get_by_id(&id).await.unwrap().unwrap();

    assert_eq!(created.views, 0);
    assert_eq!(created.published_at, None);
    assert_eq!(created.status, BlogStatus::Draft);
}

#[tokio::test]
async fn blog_create_published_stamps_published_at() {
    let store = Arc::new(MemoryDocumentStore::new());
    let blogs = blog_service(&store);

    let id = blogs
        .create(post("Hello", "hello", BlogStatus::Published))
        .await
        .unwrap();
    let created = blogs.get_by_id(&id).await.unwrap().unwrap();

    assert_eq!(created.views, 0);
    assert!(created.published_at.is_some());
}

#[tokio::test]
async fn blog_list_filters_by_status_client_side() {
    let store = Arc::new(MemoryDocumentStore::new());
    let blogs = blog_service(&store);

    blogs.create(post("Draft", "d", BlogStatus::Draft)).await.unwrap();
    blogs
        .create(post("Live", "l", BlogStatus::Published))
        .await
        .unwrap();

    let all = blogs.list(None).await.unwrap();
    assert_eq!(all.len(), 2);

    let published = blogs.list(Some(BlogStatus::Published)).await.unwrap();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].title, "Live");
}

#[tokio::test]
async fn blog_get_by_slug_matches_zero_one_or_duplicates() {
    let store = Arc::new(MemoryDocumentStore::new());
    let blogs = blog_service(&store);

    assert!(blogs.get_by_slug("nope").await.unwrap().is_none());

    blogs.create(post("One", "one", BlogStatus::Published)).await.unwrap();
    let found = blogs.get_by_slug("one").await.unwrap().unwrap();
    assert_eq!(found.title, "One");

    // Duplicate slugs are possible; lookup returns one of them, not an
    // error.
    blogs.create(post("Two", "dup", BlogStatus::Published)).await.unwrap();
    blogs.create(post("Three", "dup", BlogStatus::Published)).await.unwrap();
    let one_of = blogs.get_by_slug("dup").await.unwrap().unwrap();
    assert_eq!(one_of.slug, "dup");
}

#[tokio::test]
async fn blog_delete_then_get_by_id_is_none() {
    let store = Arc::new(MemoryDocumentStore::new());
    let blogs = blog_service(&store);

    let id = blogs.create(post("Hello", "hello", BlogStatus::Draft)).await.unwrap();
    blogs.delete(&id).await.unwrap();

    assert!(blogs.get_by_id(&id).await.unwrap().is_none());
}

#[tokio::test]
async fn concurrent_view_increments_all_land() {
    let store = Arc::new(MemoryDocumentStore::new());
    let blogs = blog_service(&store);

    let id = blogs
        .create(post("Hello", "hello", BlogStatus::Published))
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..10 {
        let blogs = blogs.clone();
        let id = id.clone();
        handles.push(tokio::spawn(async move { blogs.increment_view(&id).await }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let viewed = blogs.get_by_id(&id).await.unwrap().unwrap();
    assert_eq!(viewed.views, 10);
}

#[tokio::test]
async fn update_transition_to_published_backfills_published_at_once() {
    let store = Arc::new(MemoryDocumentStore::new());
    let blogs = blog_service(&store);

    let id = blogs.create(post("Hello", "hello", BlogStatus::Draft)).await.unwrap();

    blogs
        .update(
            &id,
            BlogPatch {
                status: Some(BlogStatus::Published),
                ..BlogPatch::default()
            },
        )
        .await
        .unwrap();

    let published = blogs.get_by_id(&id).await.unwrap().unwrap();
    let first_published_at = published.published_at.expect("backfilled on transition");

    // A later update of an already-published post leaves the stamp alone.
    blogs
        .update(
            &id,
            BlogPatch {
                title: Some("Hello again".to_string()),
                status: Some(BlogStatus::Published),
                ..BlogPatch::default()
            },
        )
        .await
        .unwrap();

    let updated = blogs.get_by_id(&id).await.unwrap().unwrap();
    assert_eq!(updated.published_at, Some(first_published_at));
    assert_eq!(updated.title, "Hello again");
}

#[tokio::test]
async fn update_merges_without_clobbering_other_fields() {
    let store = Arc::new(MemoryDocumentStore::new());
    let blogs = blog_service(&store);

    let mut create = post("Hello", "hello", BlogStatus::Draft);
    create.tags = vec!["defense".to_string()];
    let id = blogs.create(create).await.unwrap();

    blogs
        .update(
            &id,
            BlogPatch {
                excerpt: Some("new excerpt".to_string()),
                ..BlogPatch::default()
            },
        )
        .await
        .unwrap();

    let updated = blogs.get_by_id(&id).await.unwrap().unwrap();
    assert_eq!(updated.excerpt, "new excerpt");
    assert_eq!(updated.slug, "hello");
    assert_eq!(updated.tags, vec!["defense".to_string()]);
}

#[tokio::test]
async fn upload_image_uses_the_bucket_path_convention() {
    let store = Arc::new(MemoryDocumentStore::new());
    let blogs = blog_service(&store);

    let url = blogs
        .upload_image(vec![1, 2, 3], "cover.png", "image/png")
        .await
        .unwrap();

    assert!(url.starts_with("memory://blog-images/"));
    assert!(url.ends_with("_cover.png"));
}

#[tokio::test]
async fn dashboard_counts_both_collections() {
    let store = Arc::new(MemoryDocumentStore::new());
    let contacts = contact_service(&store);
    let blogs = blog_service(&store);
    let dashboard = DashboardService::new(Arc::clone(&store) as Arc<dyn DocumentStore>);

    contacts
        .create(submission("A", "a@x.com", "hi"))
        .await
        .unwrap();
    blogs
        .create(post("Hello", "hello", BlogStatus::Published))
        .await
        .unwrap();

    let summary = dashboard.snapshot().await;
    assert_eq!(summary.stats.total_contacts, 1);
    assert_eq!(summary.stats.recent_contacts, 1);
    assert_eq!(summary.stats.total_blogs, 1);
    assert_eq!(summary.stats.recent_blogs, 1);
    assert_eq!(summary.recent_contacts.len(), 1);
    assert_eq!(summary.recent_blogs[0].title, "Hello");
}

// -- Failure injection ----------------------------------------------------

/// Wraps the memory store and fails selected operations, for pinning the
/// swallow/degrade contracts.
struct FaultyStore {
    inner: MemoryDocumentStore,
    fail_increment: bool,
    fail_window_for: Option<&'static str>,
    increment_attempts: AtomicUsize,
}

impl FaultyStore {
    fn new(fail_increment: bool, fail_window_for: Option<&'static str>) -> Self {
        Self {
            inner: MemoryDocumentStore::new(),
            fail_increment,
            fail_window_for,
            increment_attempts: AtomicUsize::new(0),
        }
    }

    fn injected() -> StoreError {
        StoreError::Query("injected failure".to_string())
    }
}

#[async_trait]
impl DocumentStore for FaultyStore {
    async fn insert(
        &self,
        collection: &str,
        fields: Map<String, Value>,
        server_timestamps: &[&str],
    ) -> Result<String, StoreError> {
        self.inner.insert(collection, fields, server_timestamps).await
    }

    async fn fetch_all(
        &self,
        collection: &str,
        order_field: &str,
    ) -> Result<Vec<Document>, StoreError> {
        self.inner.fetch_all(collection, order_field).await
    }

    async fn fetch_one(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        self.inner.fetch_one(collection, id).await
    }

    async fn query_eq(
        &self,
        collection: &str,
        field: &str,
        value: Value,
        limit: u32,
    ) -> Result<Vec<Document>, StoreError> {
        self.inner.query_eq(collection, field, value, limit).await
    }

    async fn fetch_since(
        &self,
        collection: &str,
        field: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<Document>, StoreError> {
        if self.fail_window_for == Some(collection) {
            return Err(Self::injected());
        }
        self.inner.fetch_since(collection, field, since).await
    }

    async fn update_merge(
        &self,
        collection: &str,
        id: &str,
        patch: Map<String, Value>,
        server_timestamps: &[&str],
    ) -> Result<(), StoreError> {
        self.inner
            .update_merge(collection, id, patch, server_timestamps)
            .await
    }

    async fn increment(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        delta: i64,
    ) -> Result<(), StoreError> {
        self.increment_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_increment {
            return Err(Self::injected());
        }
        self.inner.increment(collection, id, field, delta).await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.inner.delete(collection, id).await
    }

    async fn watch(
        &self,
        collection: &str,
        order_field: &str,
        handler: WatchHandler,
    ) -> Result<WatchGuard, StoreError> {
        self.inner.watch(collection, order_field, handler).await
    }
}

#[tokio::test]
async fn increment_view_swallows_backend_failures() {
    let store = Arc::new(FaultyStore::new(true, None));
    let blogs = BlogService::new(
        Arc::clone(&store) as Arc<dyn DocumentStore>,
        Arc::new(MemoryBlobStore::new()),
    );

    // Must not propagate; the reader's navigation never sees the failure.
    blogs.increment_view("whatever").await;

    assert_eq!(store.increment_attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn dashboard_degrades_per_query() {
    let store = Arc::new(FaultyStore::new(false, Some("blogs")));
    let contacts = ContactService::new(Arc::clone(&store) as Arc<dyn DocumentStore>);
    let blogs = BlogService::new(
        Arc::clone(&store) as Arc<dyn DocumentStore>,
        Arc::new(MemoryBlobStore::new()),
    );
    let dashboard = DashboardService::new(Arc::clone(&store) as Arc<dyn DocumentStore>);

    contacts
        .create(submission("A", "a@x.com", "hi"))
        .await
        .unwrap();
    blogs
        .create(post("Hello", "hello", BlogStatus::Published))
        .await
        .unwrap();

    let summary = dashboard.snapshot().await;

    // The broken window query degrades to zero; everything else is live.
    assert_eq!(summary.stats.recent_blogs, 0);
    assert!(summary.recent_blogs.is_empty());
    assert_eq!(summary.stats.total_blogs, 1);
    assert_eq!(summary.stats.total_contacts, 1);
    assert_eq!(summary.stats.recent_contacts, 1);
}
