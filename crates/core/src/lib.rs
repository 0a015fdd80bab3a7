pub mod bootstrap;
pub mod error;
pub mod ingest;
pub mod models;
pub mod schema;
pub mod stores;
pub mod tabular;
pub mod traits;

pub use bootstrap::ensure_collection;
pub use error::{IngestError, StoreError};
pub use ingest::ingest_rows;
pub use models::{
    CollectionSchema, Document, FieldType, IngestionResult, RetryPolicy, RowFailure,
    TabularDataset, WriteAck,
};
pub use schema::infer_schema;
pub use stores::{OpenSearchStore, StoreCredentials};
pub use tabular::parse_csv;
pub use traits::DocumentStore;
