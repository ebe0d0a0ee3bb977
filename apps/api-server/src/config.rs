//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use aegis_core::domain::AllowList;
use aegis_infra::{FirestoreConfig, StorageConfig};

/// Application configuration. Backend settings are optional: when they
/// are missing the server falls back to the in-memory stores, which is
/// the local-development mode.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub firestore: Option<FirestoreConfig>,
    pub storage: Option<StorageConfig>,
    pub allow_list: AllowList,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let token = env::var("FIREBASE_AUTH_TOKEN").ok();

        let firestore = env::var("FIREBASE_PROJECT_ID").ok().map(|project_id| {
            let mut config = FirestoreConfig::new(project_id);
            config.auth_token = token.clone();
            if let Some(seconds) = env::var("FIRESTORE_POLL_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
            {
                config.poll_interval = Duration::from_secs(seconds);
            }
            config
        });

        let storage = env::var("FIREBASE_STORAGE_BUCKET")
            .ok()
            .map(|bucket| StorageConfig {
                bucket,
                auth_token: token,
            });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            firestore,
            storage,
            allow_list: AllowList::from_csv(
                &env::var("ADMIN_ALLOWED_EMAILS").unwrap_or_default(),
            ),
        }
    }
}
