//! Blog posts and their editor-boundary helpers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::decode::{opt_timestamp, str_field, string_list, timestamp_or_now};
use crate::ports::Document;

/// Publication state. Determines client-side filtering only: nothing
/// enforces transitions, and a scheduled post is metadata, not a pending
/// job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlogStatus {
    Draft,
    Published,
    Scheduled,
}

impl Default for BlogStatus {
    /// Documents written before the status field existed are live posts.
    fn default() -> Self {
        Self::Published
    }
}

impl BlogStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Scheduled => "scheduled",
        }
    }

    /// Parse the wire form; `None` for anything unrecognized.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "draft" => Some(Self::Draft),
            "published" => Some(Self::Published),
            "scheduled" => Some(Self::Scheduled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogAuthor {
    pub name: String,
    #[serde(rename = "photoURL", skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Default for BlogAuthor {
    fn default() -> Self {
        Self {
            name: "Admin".to_string(),
            photo_url: None,
            email: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogSeo {
    #[serde(default)]
    pub meta_title: String,
    #[serde(default)]
    pub meta_description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_image: Option<String>,
}

/// A blog post as read from the `blogs` collection (camelCase fields).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    /// Sanitized HTML from the editor.
    pub content: String,
    pub cover_image: String,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
    pub status: BlogStatus,
    pub author: BlogAuthor,
    pub seo: BlogSeo,
    pub views: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BlogPost {
    /// Decode a raw store document, applying the collection's defaults in
    /// one place so list, get-by-id and get-by-slug cannot drift: missing
    /// lists are empty, a missing author is "Admin", a missing status is
    /// published, a missing counter is zero.
    pub fn from_document(doc: Document) -> Self {
        let f = &doc.fields;
        Self {
            title: str_field(f, "title"),
            slug: str_field(f, "slug"),
            excerpt: str_field(f, "excerpt"),
            content: str_field(f, "content"),
            cover_image: str_field(f, "coverImage"),
            tags: string_list(f, "tags"),
            categories: string_list(f, "categories"),
            status: decode_or_default(f, "status"),
            author: decode_or_default(f, "author"),
            seo: decode_or_default(f, "seo"),
            views: f.get("views").and_then(Value::as_i64).unwrap_or(0),
            scheduled_date: f
                .get("scheduledDate")
                .and_then(Value::as_str)
                .map(str::to_string),
            published_at: opt_timestamp(f, "publishedAt"),
            created_at: timestamp_or_now(f, "createdAt"),
            updated_at: timestamp_or_now(f, "updatedAt"),
            id: doc.id,
        }
    }
}

fn decode_or_default<T>(fields: &Map<String, Value>, key: &str) -> T
where
    T: serde::de::DeserializeOwned + Default,
{
    fields
        .get(key)
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default()
}

/// Payload for creating a post. Slug and excerpt are already derived by
/// the editor boundary; the service persists them as given.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostCreate {
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    #[serde(default)]
    pub cover_image: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    pub status: BlogStatus,
    #[serde(default)]
    pub author: BlogAuthor,
    #[serde(default)]
    pub seo: BlogSeo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<String>,
}

impl BlogPostCreate {
    /// Encode as store fields. `views`, `createdAt`, `updatedAt` and
    /// `publishedAt` are owned by the service, not the payload.
    pub fn into_fields(self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("title".into(), json!(self.title));
        fields.insert("slug".into(), json!(self.slug));
        fields.insert("excerpt".into(), json!(self.excerpt));
        fields.insert("content".into(), json!(self.content));
        fields.insert("coverImage".into(), json!(self.cover_image));
        fields.insert("tags".into(), json!(self.tags));
        fields.insert("categories".into(), json!(self.categories));
        fields.insert("status".into(), json!(self.status));
        fields.insert("author".into(), json!(self.author));
        fields.insert("seo".into(), json!(self.seo));
        if let Some(scheduled) = self.scheduled_date {
            fields.insert("scheduledDate".into(), json!(scheduled));
        }
        fields
    }
}

/// Partial update: only present fields are written. There is no
/// `published_at` here on purpose; that field is owned by the service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPatch {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub cover_image: Option<String>,
    pub tags: Option<Vec<String>>,
    pub categories: Option<Vec<String>>,
    pub status: Option<BlogStatus>,
    pub author: Option<BlogAuthor>,
    pub seo: Option<BlogSeo>,
    pub scheduled_date: Option<String>,
}

impl BlogPatch {
    pub fn into_fields(self) -> Map<String, Value> {
        let mut fields = Map::new();
        insert_some(&mut fields, "title", self.title.map(Value::from));
        insert_some(&mut fields, "slug", self.slug.map(Value::from));
        insert_some(&mut fields, "excerpt", self.excerpt.map(Value::from));
        insert_some(&mut fields, "content", self.content.map(Value::from));
        insert_some(&mut fields, "coverImage", self.cover_image.map(Value::from));
        insert_some(&mut fields, "tags", self.tags.map(|v| json!(v)));
        insert_some(&mut fields, "categories", self.categories.map(|v| json!(v)));
        insert_some(&mut fields, "status", self.status.map(|v| json!(v)));
        insert_some(&mut fields, "author", self.author.map(|v| json!(v)));
        insert_some(&mut fields, "seo", self.seo.map(|v| json!(v)));
        insert_some(
            &mut fields,
            "scheduledDate",
            self.scheduled_date.map(Value::from),
        );
        fields
    }
}

fn insert_some(fields: &mut Map<String, Value>, key: &str, value: Option<Value>) {
    if let Some(value) = value {
        fields.insert(key.to_string(), value);
    }
}

/// Derive a URL-safe slug from a title: lowercase, with every run of
/// non-alphanumeric characters collapsed to a single separator and no
/// leading or trailing separator.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_sep = false;
    for c in title.chars() {
        if c.is_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('-');
            }
            pending_sep = false;
            for lower in c.to_lowercase() {
                slug.push(lower);
            }
        } else {
            pending_sep = true;
        }
    }
    slug
}

/// Strip tags from editor HTML and truncate on a whitespace-normalized
/// character budget, for use as a listing excerpt.
pub fn excerpt_from_html(html: &str, max_chars: usize) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.chars().count() <= max_chars {
        return text;
    }
    let truncated: String = text.chars().take(max_chars).collect();
    format!("{}…", truncated.trim_end())
}
