//! Data Transfer Objects - request/response types for the API.
//!
//! Entities themselves (posts, submissions, dashboard rows) serialize
//! straight from `aegis_core::domain`; the types here cover what the
//! wire needs beyond them.

use serde::{Deserialize, Serialize};

use aegis_core::domain::{
    BlogAuthor, BlogPostCreate, BlogSeo, BlogStatus, excerpt_from_html, slugify,
};

const EXCERPT_MAX_CHARS: usize = 200;

/// Request to create a blog post. Slug and excerpt are optional here:
/// this boundary derives them once, and the service below never
/// re-derives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlogRequest {
    pub title: String,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: String,
    pub cover_image: Option<String>,
    pub tags: Option<Vec<String>>,
    pub categories: Option<Vec<String>>,
    pub status: Option<BlogStatus>,
    pub author: Option<BlogAuthor>,
    pub seo: Option<BlogSeo>,
    pub scheduled_date: Option<String>,
}

impl CreateBlogRequest {
    /// Fill the derived fields and defaults: slug from the title when
    /// absent, excerpt from the content when absent, draft status when
    /// unspecified.
    pub fn into_post(self) -> BlogPostCreate {
        let slug = match self.slug {
            Some(slug) if !slug.trim().is_empty() => slug,
            _ => slugify(&self.title),
        };
        let excerpt = match self.excerpt {
            Some(excerpt) if !excerpt.trim().is_empty() => excerpt,
            _ => excerpt_from_html(&self.content, EXCERPT_MAX_CHARS),
        };
        BlogPostCreate {
            title: self.title,
            slug,
            excerpt,
            content: self.content,
            cover_image: self.cover_image.unwrap_or_default(),
            tags: self.tags.unwrap_or_default(),
            categories: self.categories.unwrap_or_default(),
            status: self.status.unwrap_or(BlogStatus::Draft),
            author: self.author.unwrap_or_default(),
            seo: self.seo.unwrap_or_default(),
            scheduled_date: self.scheduled_date,
        }
    }
}

/// Response carrying the id of a freshly created document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdResponse {
    pub id: String,
}

/// Response carrying the public URL of an uploaded image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub url: String,
}

/// Response for the admin identity probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    pub email: String,
}
