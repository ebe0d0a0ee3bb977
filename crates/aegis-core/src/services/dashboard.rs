//! Admin dashboard aggregation.

use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::domain::{BlogPost, ContactSubmission, DashboardStats, DashboardSummary};
use crate::error::StoreError;
use crate::ports::{Document, DocumentStore};

const CONTACTS: &str = "contact_submissions";
const BLOGS: &str = "blogs";
const RECENT_LIMIT: usize = 5;
const WINDOW_DAYS: i64 = 7;

/// Builds the admin dashboard snapshot: four independent reads, no
/// caching, recomputed on every call.
#[derive(Clone)]
pub struct DashboardService {
    store: Arc<dyn DocumentStore>,
}

impl DashboardService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Counts for both collections plus their 7-day windows, and the five
    /// most recent rows of each window. Each read degrades independently
    /// to zero/empty on failure so one broken query cannot take the whole
    /// dashboard down.
    pub async fn snapshot(&self) -> DashboardSummary {
        let since = Utc::now() - Duration::days(WINDOW_DAYS);

        let all_contacts = read_or_empty(
            self.store.fetch_all(CONTACTS, "created_at").await,
            "contacts_total",
        );
        let recent_contacts = read_or_empty(
            self.store.fetch_since(CONTACTS, "created_at", since).await,
            "contacts_window",
        );
        let all_blogs = read_or_empty(
            self.store.fetch_all(BLOGS, "createdAt").await,
            "blogs_total",
        );
        let recent_blogs = read_or_empty(
            self.store.fetch_since(BLOGS, "createdAt", since).await,
            "blogs_window",
        );

        let stats = DashboardStats {
            total_contacts: all_contacts.len() as u64,
            recent_contacts: recent_contacts.len() as u64,
            total_blogs: all_blogs.len() as u64,
            recent_blogs: recent_blogs.len() as u64,
        };

        DashboardSummary {
            stats,
            recent_contacts: recent_contacts
                .into_iter()
                .take(RECENT_LIMIT)
                .map(|doc| ContactSubmission::from_document(doc).into())
                .collect(),
            recent_blogs: recent_blogs
                .into_iter()
                .take(RECENT_LIMIT)
                .map(|doc| BlogPost::from_document(doc).into())
                .collect(),
        }
    }
}

fn read_or_empty(result: Result<Vec<Document>, StoreError>, query: &str) -> Vec<Document> {
    result.unwrap_or_else(|err| {
        tracing::warn!(query, error = %err, "Dashboard query failed; degrading to empty");
        Vec::new()
    })
}
