use crate::models::{CollectionSchema, Document, WriteAck};
use crate::StoreError;
use async_trait::async_trait;
use serde_json::Value;

/// The consumed surface of the external document store. Implemented over
/// HTTP in production and by in-memory fakes in tests.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Existence probe for a collection; must not write anything.
    async fn collection_exists(&self, name: &str) -> Result<bool, StoreError>;

    async fn create_collection(
        &self,
        name: &str,
        schema: &CollectionSchema,
    ) -> Result<(), StoreError>;

    /// Upsert one document keyed by `id`. With `wait_for_visibility` the
    /// store must make the write readable before acknowledging it.
    async fn upsert_document(
        &self,
        collection: &str,
        id: u64,
        document: &Document,
        wait_for_visibility: bool,
    ) -> Result<WriteAck, StoreError>;

    async fn search(
        &self,
        collection: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Value>, StoreError>;
}
