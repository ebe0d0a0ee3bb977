//! Admin dashboard aggregates. Computed per request, never persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::blog::BlogPost;
use super::contact::ContactSubmission;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_contacts: u64,
    pub recent_contacts: u64,
    pub total_blogs: u64,
    pub recent_blogs: u64,
}

/// A submission row for the dashboard's recent-activity list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentContact {
    pub id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<ContactSubmission> for RecentContact {
    fn from(submission: ContactSubmission) -> Self {
        Self {
            id: submission.id,
            name: submission.name,
            email: submission.email,
            message: submission.message,
            created_at: submission.created_at,
        }
    }
}

/// A post row for the dashboard's recent-activity list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentBlog {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

impl From<BlogPost> for RecentBlog {
    fn from(post: BlogPost) -> Self {
        Self {
            id: post.id,
            title: post.title,
            created_at: post.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub stats: DashboardStats,
    pub recent_contacts: Vec<RecentContact>,
    pub recent_blogs: Vec<RecentBlog>,
}
