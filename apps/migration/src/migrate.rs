//! The per-row migration loop.

use serde_json::{Map, Value, json};

use aegis_core::ports::DocumentStore;
use aegis_infra::relational::contact_submission;

const TARGET_COLLECTION: &str = "contact_submissions";

/// Outcome counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub migrated: usize,
    pub failed: usize,
}

/// Copy every row into the target collection, oldest first (the caller
/// fetched them in that order). Row failures are counted and logged and
/// never abort the batch; only the initial fetch, upstream of this
/// function, can do that.
pub async fn migrate(
    rows: Vec<contact_submission::Model>,
    target: &dyn DocumentStore,
) -> MigrationReport {
    let mut report = MigrationReport::default();

    for row in rows {
        let source_id = row.id;
        match target
            .insert(TARGET_COLLECTION, fields_for(row), &["migrated_at"])
            .await
        {
            Ok(target_id) => {
                report.migrated += 1;
                tracing::info!(source_id = %source_id, target_id = %target_id, "Migrated submission");
            }
            Err(err) => {
                report.failed += 1;
                tracing::error!(source_id = %source_id, error = %err, "Failed to migrate submission");
            }
        }
    }

    report
}

/// Document fields for one source row. The original timestamps travel
/// with the row; `migrated_at` is stamped by the target store.
fn fields_for(row: contact_submission::Model) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("name".to_string(), json!(row.name));
    fields.insert("email".to_string(), json!(row.email));
    fields.insert("message".to_string(), json!(row.message));
    fields.insert("created_at".to_string(), json!(row.created_at.to_rfc3339()));
    fields.insert("updated_at".to_string(), json!(row.updated_at.to_rfc3339()));
    fields
}
