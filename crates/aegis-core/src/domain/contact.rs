//! Contact-form submissions.
//!
//! The `contact_submissions` collection keeps its historical snake_case
//! field names for compatibility with the live database; the `blogs`
//! collection is camelCase. See DESIGN.md.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::decode::{opt_timestamp, str_field};
use crate::ports::Document;

/// A message sent through the public contact form.
///
/// Immutable once stored: the only mutation ever applied is deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub id: String,
    pub name: String,
    pub company: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ContactSubmission {
    /// Decode a raw store document, applying the collection's defaults in
    /// one place. Timestamps may be unassigned in the window right after a
    /// write; that reads as `None`, never an error.
    pub fn from_document(doc: Document) -> Self {
        let f = &doc.fields;
        Self {
            name: str_field(f, "name"),
            company: str_field(f, "company"),
            email: str_field(f, "email"),
            phone: str_field(f, "phone"),
            message: str_field(f, "message"),
            created_at: opt_timestamp(f, "created_at"),
            updated_at: opt_timestamp(f, "updated_at"),
            id: doc.id,
        }
    }
}

/// Payload accepted from the contact form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactSubmissionCreate {
    pub name: String,
    #[serde(default)]
    pub company: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub message: String,
}

impl ContactSubmissionCreate {
    /// Encode as store fields. `created_at`/`updated_at` are stamped by
    /// the store at write time, not here.
    pub fn into_fields(self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("name".into(), json!(self.name));
        fields.insert("company".into(), json!(self.company));
        fields.insert("email".into(), json!(self.email));
        fields.insert("phone".into(), json!(self.phone));
        fields.insert("message".into(), json!(self.message));
        fields
    }
}
