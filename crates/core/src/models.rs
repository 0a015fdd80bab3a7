use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// One row as field->value pairs, keyed by column name.
pub type Document = serde_json::Map<String, Value>;

/// Parsed tabular input: ordered column names plus row-major scalar values.
/// Every row holds exactly one value (possibly null) per declared column.
#[derive(Debug, Clone, PartialEq)]
pub struct TabularDataset {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Keyword,
    Integer,
    Double,
    Boolean,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Keyword => "keyword",
            FieldType::Integer => "integer",
            FieldType::Double => "double",
            FieldType::Boolean => "boolean",
        }
    }
}

/// Field declarations for a collection, in column order. Immutable once the
/// collection has been created; the store ignores later redeclarations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CollectionSchema {
    pub fields: Vec<(String, FieldType)>,
}

impl CollectionSchema {
    /// Fallback used when bootstrap runs before any upload has been seen.
    pub fn default_text() -> Self {
        Self {
            fields: vec![("text".to_string(), FieldType::Text)],
        }
    }

    /// Mapping body in the store's `{"field": {"type": "..."}}` shape.
    pub fn properties(&self) -> Value {
        let mut properties = serde_json::Map::new();
        for (name, field_type) in &self.fields {
            properties.insert(
                name.clone(),
                serde_json::json!({"type": field_type.as_str()}),
            );
        }
        Value::Object(properties)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteAck {
    Created,
    Updated,
}

#[derive(Debug, Clone, Serialize)]
pub struct RowFailure {
    pub row: usize,
    pub reason: String,
}

/// Outcome of one upload: every row attempted exactly once, partial failure
/// reported here rather than raised.
#[derive(Debug, Clone, Serialize)]
pub struct IngestionResult {
    pub succeeded: usize,
    pub total: usize,
    pub failures: Vec<RowFailure>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 10,
            delay: Duration::from_secs(3),
        }
    }
}

impl RetryPolicy {
    /// Single probe, no waiting. Used on the request path, where the startup
    /// retry budget must not apply.
    pub fn no_retry() -> Self {
        Self {
            attempts: 1,
            delay: Duration::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn schema_properties_follow_store_mapping_shape() {
        let schema = CollectionSchema {
            fields: vec![
                ("title".to_string(), FieldType::Text),
                ("year".to_string(), FieldType::Integer),
            ],
        };

        assert_eq!(
            schema.properties(),
            json!({
                "title": {"type": "text"},
                "year": {"type": "integer"},
            })
        );
    }

    #[test]
    fn default_schema_is_a_single_text_field() {
        let schema = CollectionSchema::default_text();
        assert_eq!(schema.fields, vec![("text".to_string(), FieldType::Text)]);
    }

    #[test]
    fn default_retry_policy_matches_startup_budget() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.attempts, 10);
        assert_eq!(policy.delay, Duration::from_secs(3));
    }
}
