//! Firebase Storage REST adapter.

use async_trait::async_trait;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::Value;
use url::Url;

use aegis_core::error::BlobError;
use aegis_core::ports::BlobStore;

use super::StorageConfig;

const BASE_URL: &str = "https://firebasestorage.googleapis.com/v0/b";

/// Uploads blobs to a Firebase Storage bucket and returns the public
/// `alt=media` URL (with the download token when the bucket issues one).
pub struct FirebaseBlobStore {
    http: reqwest::Client,
    config: StorageConfig,
}

impl FirebaseBlobStore {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn public_url(&self, path: &str, token: Option<&str>) -> String {
        // The object name is a single path segment in the public URL, so
        // its slashes must be escaped too.
        let encoded = utf8_percent_encode(path, NON_ALPHANUMERIC);
        let mut url = format!("{}/{}/o/{}?alt=media", BASE_URL, self.config.bucket, encoded);
        if let Some(token) = token {
            url.push_str("&token=");
            url.push_str(token);
        }
        url
    }
}

#[async_trait]
impl BlobStore for FirebaseBlobStore {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, BlobError> {
        let mut url = Url::parse(&format!("{}/{}/o", BASE_URL, self.config.bucket))
            .map_err(|err| BlobError::Upload(err.to_string()))?;
        url.query_pairs_mut()
            .append_pair("uploadType", "media")
            .append_pair("name", path);

        let mut request = self
            .http
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes);
        if let Some(token) = &self.config.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|err| BlobError::Connection(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BlobError::Upload(format!("{status}: {body}")));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|err| BlobError::Upload(err.to_string()))?;
        let token = body.get("downloadTokens").and_then(Value::as_str);
        Ok(self.public_url(path, token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> FirebaseBlobStore {
        FirebaseBlobStore::new(StorageConfig {
            bucket: "aegis-site.appspot.com".to_string(),
            auth_token: None,
        })
    }

    #[test]
    fn public_url_escapes_the_object_path() {
        let url = store().public_url("blog-images/17_cover image.png", None);
        assert_eq!(
            url,
            "https://firebasestorage.googleapis.com/v0/b/aegis-site.appspot.com/o/blog%2Dimages%2F17%5Fcover%20image%2Epng?alt=media"
        );
    }

    #[test]
    fn public_url_appends_the_download_token() {
        let url = store().public_url("a", Some("tok"));
        assert!(url.ends_with("/o/a?alt=media&token=tok"));
    }
}
