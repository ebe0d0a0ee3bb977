//! In-memory document store - the fallback when the remote backend is
//! not configured, and the store the test suite runs against.
//!
//! Data is lost on process restart.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use tokio::sync::{RwLock, broadcast};
use uuid::Uuid;

use aegis_core::error::StoreError;
use aegis_core::ports::{Document, DocumentStore, WatchGuard, WatchHandler};

type Fields = Map<String, Value>;
type Collections = HashMap<String, BTreeMap<String, Fields>>;

const CHANGE_BUFFER: usize = 16;

/// In-memory document store over nested maps, with broadcast change
/// notifications driving `watch`.
pub struct MemoryDocumentStore {
    collections: Arc<RwLock<Collections>>,
    changes: Arc<RwLock<HashMap<String, broadcast::Sender<()>>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            collections: Arc::new(RwLock::new(HashMap::new())),
            changes: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Server timestamps are written as fixed-width RFC 3339 so the
    /// decoders and the order comparator both see one format and
    /// lexicographic order matches chronological order.
    fn server_timestamp() -> Value {
        Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true))
    }

    async fn notify(&self, collection: &str) {
        let changes = self.changes.read().await;
        if let Some(sender) = changes.get(collection) {
            // Ignore send errors (no live watchers).
            let _ = sender.send(());
        }
    }
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert(
        &self,
        collection: &str,
        mut fields: Fields,
        server_timestamps: &[&str],
    ) -> Result<String, StoreError> {
        for stamp in server_timestamps {
            fields.insert((*stamp).to_string(), Self::server_timestamp());
        }

        let id = Uuid::new_v4().simple().to_string();
        {
            let mut collections = self.collections.write().await;
            collections
                .entry(collection.to_string())
                .or_default()
                .insert(id.clone(), fields);
        }
        self.notify(collection).await;
        Ok(id)
    }

    async fn fetch_all(
        &self,
        collection: &str,
        order_field: &str,
    ) -> Result<Vec<Document>, StoreError> {
        Ok(snapshot(&self.collections, collection, order_field).await)
    }

    async fn fetch_one(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|fields| Document {
                id: id.to_string(),
                fields: fields.clone(),
            }))
    }

    async fn query_eq(
        &self,
        collection: &str,
        field: &str,
        value: Value,
        limit: u32,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, fields)| fields.get(field) == Some(&value))
                    .take(limit as usize)
                    .map(|(id, fields)| Document {
                        id: id.clone(),
                        fields: fields.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn fetch_since(
        &self,
        collection: &str,
        field: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        let mut docs: Vec<Document> = collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, fields)| {
                        field_timestamp(fields, field).is_some_and(|ts| ts >= since)
                    })
                    .map(|(id, fields)| Document {
                        id: id.clone(),
                        fields: fields.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        drop(collections);
        sort_desc(&mut docs, field);
        Ok(docs)
    }

    async fn update_merge(
        &self,
        collection: &str,
        id: &str,
        patch: Fields,
        server_timestamps: &[&str],
    ) -> Result<(), StoreError> {
        {
            let mut collections = self.collections.write().await;
            let fields = collections
                .get_mut(collection)
                .and_then(|docs| docs.get_mut(id))
                .ok_or(StoreError::NotFound)?;

            for (key, value) in patch {
                fields.insert(key, value);
            }
            for stamp in server_timestamps {
                fields.insert((*stamp).to_string(), Self::server_timestamp());
            }
        }
        self.notify(collection).await;
        Ok(())
    }

    async fn increment(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        delta: i64,
    ) -> Result<(), StoreError> {
        {
            let mut collections = self.collections.write().await;
            let fields = collections
                .get_mut(collection)
                .and_then(|docs| docs.get_mut(id))
                .ok_or(StoreError::NotFound)?;

            let current = fields.get(field).and_then(Value::as_i64).unwrap_or(0);
            fields.insert(field.to_string(), Value::from(current + delta));
        }
        self.notify(collection).await;
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let removed = {
            let mut collections = self.collections.write().await;
            collections
                .get_mut(collection)
                .and_then(|docs| docs.remove(id))
                .is_some()
        };
        if removed {
            self.notify(collection).await;
        }
        Ok(())
    }

    async fn watch(
        &self,
        collection: &str,
        order_field: &str,
        handler: WatchHandler,
    ) -> Result<WatchGuard, StoreError> {
        let mut rx = {
            let mut changes = self.changes.write().await;
            changes
                .entry(collection.to_string())
                .or_insert_with(|| broadcast::channel(CHANGE_BUFFER).0)
                .subscribe()
        };

        let collections = Arc::clone(&self.collections);
        let collection = collection.to_string();
        let order_field = order_field.to_string();

        let task = tokio::spawn(async move {
            handler(snapshot(&collections, &collection, &order_field).await).await;

            loop {
                match rx.recv().await {
                    Ok(()) => {
                        handler(snapshot(&collections, &collection, &order_field).await).await;
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        // Coalesce: one fresh snapshot covers the missed
                        // notifications.
                        tracing::warn!(
                            collection = %collection,
                            skipped,
                            "Watch lagged; delivering coalesced snapshot"
                        );
                        handler(snapshot(&collections, &collection, &order_field).await).await;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        Ok(WatchGuard::new(move || task.abort()))
    }
}

async fn snapshot(
    collections: &RwLock<Collections>,
    collection: &str,
    order_field: &str,
) -> Vec<Document> {
    let guard = collections.read().await;
    let mut docs: Vec<Document> = guard
        .get(collection)
        .map(|docs| {
            docs.iter()
                .map(|(id, fields)| Document {
                    id: id.clone(),
                    fields: fields.clone(),
                })
                .collect()
        })
        .unwrap_or_default();
    drop(guard);
    sort_desc(&mut docs, order_field);
    docs
}

fn sort_desc(docs: &mut [Document], field: &str) {
    docs.sort_by(|a, b| cmp_values(b.fields.get(field), a.fields.get(field)));
}

fn cmp_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

fn field_timestamp(fields: &Fields, field: &str) -> Option<DateTime<Utc>> {
    fields
        .get(field)
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}
