use crate::models::{Document, IngestionResult, RowFailure, TabularDataset};
use crate::traits::DocumentStore;
use serde_json::Value;
use tracing::warn;

/// Writes every row of the dataset as one document, strictly in file order.
///
/// Each row becomes a synchronous-visibility upsert keyed by its 0-based
/// ordinal, so re-ingesting the same file overwrites the same documents.
/// A row counts as succeeded only on an explicit created/updated
/// acknowledgment; failed rows are recorded and never retried, and the call
/// always returns normally with `total == rows attempted`.
pub async fn ingest_rows(
    store: &dyn DocumentStore,
    collection: &str,
    dataset: &TabularDataset,
) -> IngestionResult {
    let total = dataset.rows.len();
    let mut succeeded = 0;
    let mut failures = Vec::new();

    for (ordinal, row) in dataset.rows.iter().enumerate() {
        let document = build_document(&dataset.columns, row);
        match store
            .upsert_document(collection, ordinal as u64, &document, true)
            .await
        {
            Ok(_) => succeeded += 1,
            Err(error) => {
                warn!(row = ordinal, %error, "document write not acknowledged");
                failures.push(RowFailure {
                    row: ordinal,
                    reason: error.to_string(),
                });
            }
        }
    }

    IngestionResult {
        succeeded,
        total,
        failures,
    }
}

fn build_document(columns: &[String], row: &[Value]) -> Document {
    columns.iter().cloned().zip(row.iter().cloned()).collect()
}
