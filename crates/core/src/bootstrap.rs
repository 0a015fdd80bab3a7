use crate::models::{CollectionSchema, RetryPolicy};
use crate::traits::DocumentStore;
use crate::StoreError;
use tracing::{debug, info, warn};

/// Guarantees the target collection exists before any writes occur.
///
/// Probes for existence first and only issues a create when the probe
/// reports "not found", so the call is idempotent. Transient connection
/// failures (the store may still be starting) are retried up to
/// `retry.attempts` with a fixed delay; exhausting the budget yields
/// [`StoreError::Unavailable`]. A rejected create surfaces immediately as
/// [`StoreError::CollectionCreateFailed`].
///
/// Returns `true` when this call created the collection, `false` when it
/// was already present.
pub async fn ensure_collection(
    store: &dyn DocumentStore,
    name: &str,
    schema: &CollectionSchema,
    retry: &RetryPolicy,
) -> Result<bool, StoreError> {
    let mut last_failure = String::new();

    for attempt in 1..=retry.attempts {
        match store.collection_exists(name).await {
            Ok(true) => {
                debug!(collection = name, "collection already present");
                return Ok(false);
            }
            Ok(false) => {
                store.create_collection(name, schema).await?;
                info!(collection = name, "created collection");
                return Ok(true);
            }
            Err(error) if error.is_transient() => {
                warn!(
                    collection = name,
                    attempt,
                    max_attempts = retry.attempts,
                    %error,
                    "store not reachable yet"
                );
                last_failure = error.to_string();
                if attempt < retry.attempts {
                    tokio::time::sleep(retry.delay).await;
                }
            }
            Err(error) => return Err(error),
        }
    }

    Err(StoreError::Unavailable {
        attempts: retry.attempts,
        details: last_failure,
    })
}
