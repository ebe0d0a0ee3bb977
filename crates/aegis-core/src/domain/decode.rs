//! Field extraction helpers shared by the entity decoders.
//!
//! Every entity decodes through these exactly once, in its
//! `from_document`, so list/get-by-id/get-by-slug cannot drift apart in
//! how they default missing fields.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

pub(crate) fn str_field(fields: &Map<String, Value>, key: &str) -> String {
    fields
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

pub(crate) fn string_list(fields: &Map<String, Value>, key: &str) -> Vec<String> {
    fields
        .get(key)
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default()
}

/// Timestamps travel as RFC 3339 strings. A field that is absent or not
/// yet assigned (the window right after a write) decodes to `None`.
pub(crate) fn opt_timestamp(fields: &Map<String, Value>, key: &str) -> Option<DateTime<Utc>> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

pub(crate) fn timestamp_or_now(fields: &Map<String, Value>, key: &str) -> DateTime<Utc> {
    opt_timestamp(fields, key).unwrap_or_else(Utc::now)
}
