//! One-shot migration CLI: copies every row of the relational
//! `contact_submissions` table into the document store's
//! `contact_submissions` collection.
//!
//! Exit code contract: nonzero only when the initial connect/fetch
//! fails. Per-row failures are counted and logged but the process still
//! exits zero - rerunning after a partial failure is an operator
//! decision, not an automatic one.

use std::process::ExitCode;

use anyhow::Context;

use aegis_infra::{FirestoreConfig, FirestoreStore, relational};

mod migrate;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt().with_env_filter("info").init();

    match run().await {
        Ok(report) => {
            tracing::info!(
                migrated = report.migrated,
                failed = report.failed,
                "Migration finished"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "Migration aborted before any rows were written");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<migrate::MigrationReport> {
    let source_url =
        std::env::var("SOURCE_DATABASE_URL").context("SOURCE_DATABASE_URL is not set")?;
    let project_id =
        std::env::var("FIREBASE_PROJECT_ID").context("FIREBASE_PROJECT_ID is not set")?;

    let db = relational::connect(&source_url)
        .await
        .context("connecting to the source database")?;
    tracing::info!("Source database connected");

    let rows = relational::fetch_submissions(&db)
        .await
        .context("fetching source rows")?;
    tracing::info!(rows = rows.len(), "Fetched source submissions");

    let mut config = FirestoreConfig::new(project_id);
    config.auth_token = std::env::var("FIREBASE_AUTH_TOKEN").ok();
    let target = FirestoreStore::new(config);

    Ok(migrate::migrate(rows, &target).await)
}
