//! Domain entities - the content objects behind the site.

mod access;
mod blog;
mod contact;
mod dashboard;
mod decode;

pub use access::AllowList;
pub use blog::{
    BlogAuthor, BlogPatch, BlogPost, BlogPostCreate, BlogSeo, BlogStatus, excerpt_from_html,
    slugify,
};
pub use contact::{ContactSubmission, ContactSubmissionCreate};
pub use dashboard::{DashboardStats, DashboardSummary, RecentBlog, RecentContact};
