//! HTTP surface: CSV upload ingestion and a search passthrough.
//!
//! `POST /upload_csv` accepts a multipart form with a `file` field, parses
//! it as CSV, and writes every row into the configured collection. Parse
//! failures come back as 400 before any store interaction; per-row write
//! failures are reported in the response counts, never as an error status.
//!
//! `GET /search?q=<string>&k=<int>` forwards the query to the store and
//! relays `{"results": [...]}`; store errors relay the store's status code
//! and body.

use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use csv_search_core::{
    ensure_collection, infer_schema, ingest_rows, parse_csv, DocumentStore, RetryPolicy,
    StoreError,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

const DEFAULT_RESULT_COUNT: usize = 5;

#[derive(Clone)]
struct AppState {
    store: Arc<dyn DocumentStore>,
    collection: Arc<str>,
}

pub async fn run(
    store: Arc<dyn DocumentStore>,
    collection: String,
    bind: &str,
) -> anyhow::Result<()> {
    let state = AppState {
        store,
        collection: collection.into(),
    };

    let app = Router::new()
        .route("/upload_csv", post(upload_csv))
        .route("/search", get(search))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!(addr = %bind, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}

enum ApiError {
    InvalidInput(String),
    StoreUnavailable(String),
    Upstream { status: u16, body: String },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InvalidInput(detail) => {
                (StatusCode::BAD_REQUEST, Json(json!({"detail": detail}))).into_response()
            }
            ApiError::StoreUnavailable(detail) => {
                (StatusCode::BAD_GATEWAY, Json(json!({"detail": detail}))).into_response()
            }
            ApiError::Upstream { status, body } => {
                let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                (status, body).into_response()
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        match error {
            // Relay what the store answered, verbatim.
            StoreError::Backend { status, body } => ApiError::Upstream { status, body },
            other => ApiError::StoreUnavailable(other.to_string()),
        }
    }
}

async fn upload_csv(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut payload = None;

    while let Some(field) = multipart.next_field().await.map_err(|error| {
        ApiError::InvalidInput(format!("unreadable multipart body: {error}"))
    })? {
        if field.name() == Some("file") {
            let file_name = field.file_name().unwrap_or("upload.csv").to_string();
            let bytes = field.bytes().await.map_err(|error| {
                ApiError::InvalidInput(format!("unreadable file field: {error}"))
            })?;
            payload = Some((file_name, bytes));
            break;
        }
    }

    let (file_name, bytes) = payload
        .ok_or_else(|| ApiError::InvalidInput("missing multipart field `file`".to_string()))?;

    let dataset = parse_csv(&bytes).map_err(|error| ApiError::InvalidInput(error.to_string()))?;

    // Idempotent: a single probe on the request path, without the startup
    // retry budget. The first upload to a fresh store defines the schema.
    ensure_collection(
        state.store.as_ref(),
        &state.collection,
        &infer_schema(&dataset),
        &RetryPolicy::no_retry(),
    )
    .await?;

    let result = ingest_rows(state.store.as_ref(), &state.collection, &dataset).await;

    info!(
        file = %file_name,
        indexed = result.succeeded,
        total = result.total,
        failed = result.failures.len(),
        "csv upload ingested"
    );

    Ok(Json(json!({
        "indexed": result.succeeded,
        "total": result.total,
    })))
}

#[derive(Deserialize)]
struct SearchParams {
    q: String,
    k: Option<usize>,
}

async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let limit = params.k.unwrap_or(DEFAULT_RESULT_COUNT);
    let results = state
        .store
        .search(&state.collection, &params.q, limit)
        .await?;

    Ok(Json(json!({"results": results})))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({"status": "ok", "version": env!("CARGO_PKG_VERSION")}))
}
