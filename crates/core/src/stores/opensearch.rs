use crate::models::{CollectionSchema, Document, WriteAck};
use crate::traits::DocumentStore;
use crate::StoreError;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct StoreCredentials {
    pub user: String,
    pub password: String,
}

/// HTTP client for an OpenSearch-style document store. Built once at process
/// start; the underlying connection pool is shared for the process lifetime
/// and released when the store is dropped.
pub struct OpenSearchStore {
    client: Arc<Client>,
    endpoint: String,
    credentials: Option<StoreCredentials>,
}

impl OpenSearchStore {
    pub fn new(
        endpoint: &str,
        credentials: Option<StoreCredentials>,
        accept_invalid_certs: bool,
    ) -> Result<Self, StoreError> {
        let parsed = Url::parse(endpoint)?;
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            endpoint: parsed.as_str().trim_end_matches('/').to_string(),
            credentials: credentials.filter(|c| !c.user.is_empty()),
        })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Some(credentials) => {
                request.basic_auth(&credentials.user, Some(&credentials.password))
            }
            None => request,
        }
    }

    fn collection_url(&self, name: &str) -> String {
        format!("{}/{}", self.endpoint, name)
    }
}

#[async_trait]
impl DocumentStore for OpenSearchStore {
    async fn collection_exists(&self, name: &str) -> Result<bool, StoreError> {
        let response = self
            .authorized(self.client.head(self.collection_url(name)))
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(StoreError::Backend {
                status: status.as_u16(),
                body: status.to_string(),
            }),
        }
    }

    async fn create_collection(
        &self,
        name: &str,
        schema: &CollectionSchema,
    ) -> Result<(), StoreError> {
        let response = self
            .authorized(self.client.put(self.collection_url(name)))
            .json(&json!({
                "settings": {
                    "number_of_shards": 1,
                    "number_of_replicas": 0
                },
                "mappings": {
                    "properties": schema.properties()
                }
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::CollectionCreateFailed {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        Ok(())
    }

    async fn upsert_document(
        &self,
        collection: &str,
        id: u64,
        document: &Document,
        wait_for_visibility: bool,
    ) -> Result<WriteAck, StoreError> {
        let mut url = format!("{}/_doc/{}", self.collection_url(collection), id);
        if wait_for_visibility {
            url.push_str("?refresh=wait_for");
        }

        let response = self
            .authorized(self.client.put(url))
            .json(document)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Backend {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        // Only an explicit acknowledgment counts as a successful write.
        let body: Value = response.json().await?;
        match body.pointer("/result").and_then(Value::as_str) {
            Some("created") => Ok(WriteAck::Created),
            Some("updated") => Ok(WriteAck::Updated),
            other => Err(StoreError::Backend {
                status: status.as_u16(),
                body: format!(
                    "missing write acknowledgment (result={})",
                    other.unwrap_or("absent")
                ),
            }),
        }
    }

    async fn search(
        &self,
        collection: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Value>, StoreError> {
        let body = json!({
            "size": limit,
            "query": {
                "multi_match": {
                    "query": query,
                    "fields": ["*"]
                }
            }
        });

        let response = self
            .authorized(
                self.client
                    .post(format!("{}/_search", self.collection_url(collection))),
            )
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Backend {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let response_json: Value = response.json().await?;
        let hits = response_json
            .pointer("/hits/hits")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let mut results = Vec::new();
        for hit in hits {
            let mut entry = hit
                .pointer("/_source")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default();

            if let Some(id) = hit.pointer("/_id") {
                entry.insert("_id".to_string(), id.clone());
            }
            if let Some(score) = hit.pointer("/_score") {
                entry.insert("_score".to_string(), score.clone());
            }

            results.push(Value::Object(entry));
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::{OpenSearchStore, StoreCredentials};
    use crate::StoreError;

    #[test]
    fn rejects_a_malformed_endpoint() {
        let result = OpenSearchStore::new("not a url", None, false);
        assert!(matches!(result, Err(StoreError::Url(_))));
    }

    #[test]
    fn collection_urls_have_no_double_slash() {
        let store = OpenSearchStore::new("https://localhost:9200/", None, false)
            .expect("endpoint should parse");
        assert_eq!(
            store.collection_url("csv-index"),
            "https://localhost:9200/csv-index"
        );
    }

    #[test]
    fn blank_credentials_are_dropped() {
        let store = OpenSearchStore::new(
            "https://localhost:9200",
            Some(StoreCredentials {
                user: String::new(),
                password: String::new(),
            }),
            false,
        )
        .expect("endpoint should parse");
        assert!(store.credentials.is_none());
    }
}
