//! Firestore REST client implementing the `DocumentStore` port.
//!
//! Writes that need server timestamps go through `:commit` with
//! `updateTransforms`; reads with ordering or filters go through
//! `:runQuery`. The REST surface has no listen channel, so `watch`
//! polls and diffs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Method, StatusCode};
use serde_json::{Map, Value, json};
use uuid::Uuid;

use aegis_core::error::StoreError;
use aegis_core::ports::{Document, DocumentStore, WatchGuard, WatchHandler};

use super::wire;
use crate::store::FirestoreConfig;

const BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// Firestore-backed document store.
#[derive(Clone)]
pub struct FirestoreStore {
    http: reqwest::Client,
    config: FirestoreConfig,
}

impl FirestoreStore {
    pub fn new(config: FirestoreConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// `projects/{p}/databases/(default)/documents`
    fn documents_path(&self) -> String {
        format!(
            "projects/{}/databases/(default)/documents",
            self.config.project_id
        )
    }

    /// Full resource name of one document.
    fn doc_name(&self, collection: &str, id: &str) -> String {
        format!("{}/{}/{}", self.documents_path(), collection, id)
    }

    fn request(&self, method: Method, url: String) -> reqwest::RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.config.auth_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn commit(&self, writes: Vec<Value>) -> Result<(), StoreError> {
        let url = format!("{}/{}:commit", BASE_URL, self.documents_path());
        let response = self
            .request(Method::POST, url)
            .json(&json!({ "writes": writes }))
            .send()
            .await
            .map_err(connection_err)?;
        ensure_success(response).await.map(|_| ())
    }

    async fn run_query(&self, query: Value) -> Result<Vec<Document>, StoreError> {
        let url = format!("{}/{}:runQuery", BASE_URL, self.documents_path());
        let response = self
            .request(Method::POST, url)
            .json(&json!({ "structuredQuery": query }))
            .send()
            .await
            .map_err(connection_err)?;
        let body = ensure_success(response).await?;

        // The response is a stream of result rows; only rows carrying a
        // document matter (the rest are read-time markers).
        let mut docs = Vec::new();
        for row in body.as_array().into_iter().flatten() {
            if let Some(resource) = row.get("document") {
                docs.push(wire::decode_document(resource)?);
            }
        }
        Ok(docs)
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn insert(
        &self,
        collection: &str,
        fields: Map<String, Value>,
        server_timestamps: &[&str],
    ) -> Result<String, StoreError> {
        let id = Uuid::new_v4().simple().to_string();
        let mut write = json!({
            "update": {
                "name": self.doc_name(collection, &id),
                "fields": wire::encode_fields(&fields),
            },
        });
        if !server_timestamps.is_empty() {
            write["updateTransforms"] = Value::Array(transforms(server_timestamps));
        }
        self.commit(vec![write]).await?;
        Ok(id)
    }

    async fn fetch_all(
        &self,
        collection: &str,
        order_field: &str,
    ) -> Result<Vec<Document>, StoreError> {
        self.run_query(json!({
            "from": [{ "collectionId": collection }],
            "orderBy": [{
                "field": { "fieldPath": order_field },
                "direction": "DESCENDING",
            }],
        }))
        .await
    }

    async fn fetch_one(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        let url = format!("{}/{}", BASE_URL, self.doc_name(collection, id));
        let response = self
            .request(Method::GET, url)
            .send()
            .await
            .map_err(connection_err)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body = ensure_success(response).await?;
        Ok(Some(wire::decode_document(&body)?))
    }

    async fn query_eq(
        &self,
        collection: &str,
        field: &str,
        value: Value,
        limit: u32,
    ) -> Result<Vec<Document>, StoreError> {
        self.run_query(json!({
            "from": [{ "collectionId": collection }],
            "where": {
                "fieldFilter": {
                    "field": { "fieldPath": field },
                    "op": "EQUAL",
                    "value": wire::to_wire(&value),
                },
            },
            "limit": limit,
        }))
        .await
    }

    async fn fetch_since(
        &self,
        collection: &str,
        field: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<Document>, StoreError> {
        self.run_query(json!({
            "from": [{ "collectionId": collection }],
            "where": {
                "fieldFilter": {
                    "field": { "fieldPath": field },
                    "op": "GREATER_THAN_OR_EQUAL",
                    "value": { "timestampValue": since.to_rfc3339() },
                },
            },
            "orderBy": [{
                "field": { "fieldPath": field },
                "direction": "DESCENDING",
            }],
        }))
        .await
    }

    async fn update_merge(
        &self,
        collection: &str,
        id: &str,
        patch: Map<String, Value>,
        server_timestamps: &[&str],
    ) -> Result<(), StoreError> {
        let field_paths: Vec<&str> = patch.keys().map(String::as_str).collect();
        let mut write = json!({
            "update": {
                "name": self.doc_name(collection, id),
                "fields": wire::encode_fields(&patch),
            },
            "updateMask": { "fieldPaths": field_paths },
            "currentDocument": { "exists": true },
        });
        if !server_timestamps.is_empty() {
            write["updateTransforms"] = Value::Array(transforms(server_timestamps));
        }
        self.commit(vec![write]).await
    }

    async fn increment(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        delta: i64,
    ) -> Result<(), StoreError> {
        let write = json!({
            "transform": {
                "document": self.doc_name(collection, id),
                "fieldTransforms": [{
                    "fieldPath": field,
                    "increment": { "integerValue": delta.to_string() },
                }],
            },
            "currentDocument": { "exists": true },
        });
        self.commit(vec![write]).await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let url = format!("{}/{}", BASE_URL, self.doc_name(collection, id));
        let response = self
            .request(Method::DELETE, url)
            .send()
            .await
            .map_err(connection_err)?;
        // Deleting an absent document is not an error.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        ensure_success(response).await.map(|_| ())
    }

    async fn watch(
        &self,
        collection: &str,
        order_field: &str,
        handler: WatchHandler,
    ) -> Result<WatchGuard, StoreError> {
        let store = self.clone();
        let collection = collection.to_string();
        let order_field = order_field.to_string();
        let interval = self.config.poll_interval;

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            let mut last: Option<Vec<Document>> = None;

            loop {
                ticker.tick().await;
                match store.fetch_all(&collection, &order_field).await {
                    Ok(docs) => {
                        if last.as_ref() != Some(&docs) {
                            last = Some(docs.clone());
                            handler(docs).await;
                        }
                    }
                    Err(err) => {
                        // Keep polling; the next tick may succeed.
                        tracing::warn!(
                            collection = %collection,
                            error = %err,
                            "Watch poll failed"
                        );
                    }
                }
            }
        });

        Ok(WatchGuard::new(move || task.abort()))
    }
}

fn transforms(fields: &[&str]) -> Vec<Value> {
    fields
        .iter()
        .map(|path| {
            json!({
                "fieldPath": path,
                "setToServerValue": "REQUEST_TIME",
            })
        })
        .collect()
}

fn connection_err(err: reqwest::Error) -> StoreError {
    StoreError::Connection(err.to_string())
}

async fn ensure_success(response: reqwest::Response) -> Result<Value, StoreError> {
    let status = response.status();
    if status.is_success() {
        return response
            .json::<Value>()
            .await
            .map_err(|err| StoreError::Decode(err.to_string()));
    }

    let body = response.text().await.unwrap_or_default();
    if status == StatusCode::NOT_FOUND {
        Err(StoreError::NotFound)
    } else {
        Err(StoreError::Query(format!("{status}: {body}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_names_follow_the_rest_layout() {
        let store = FirestoreStore::new(FirestoreConfig::new("aegis-site"));
        assert_eq!(
            store.doc_name("blogs", "abc"),
            "projects/aegis-site/databases/(default)/documents/blogs/abc"
        );
    }

    #[test]
    fn transforms_name_every_stamped_field() {
        let writes = transforms(&["createdAt", "updatedAt"]);
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[0]["fieldPath"], json!("createdAt"));
        assert_eq!(writes[0]["setToServerValue"], json!("REQUEST_TIME"));
    }
}
