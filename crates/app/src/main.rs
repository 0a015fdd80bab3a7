mod server;

use chrono::Utc;
use clap::Parser;
use csv_search_core::{
    ensure_collection, CollectionSchema, OpenSearchStore, RetryPolicy, StoreCredentials,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "csv-search-server", version)]
struct Cli {
    /// Document store base URL
    #[arg(long, env = "STORE_URL", default_value = "https://localhost:9200")]
    store_url: String,

    /// Basic-auth user for the store
    #[arg(long, env = "STORE_USER")]
    store_user: Option<String>,

    /// Basic-auth password for the store
    #[arg(long, env = "STORE_PASSWORD")]
    store_password: Option<String>,

    /// Target collection name
    #[arg(long, env = "COLLECTION_NAME", default_value = "csv-index")]
    collection: String,

    /// Skip TLS certificate verification when talking to the store
    #[arg(long, env = "STORE_INSECURE", default_value_t = false)]
    insecure_skip_tls_verify: bool,

    /// Listen address for the HTTP server
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8000")]
    bind: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_version = env!("CARGO_PKG_VERSION");

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();

    let credentials = match (cli.store_user, cli.store_password) {
        (Some(user), Some(password)) => Some(StoreCredentials { user, password }),
        _ => None,
    };

    let store = Arc::new(
        OpenSearchStore::new(&cli.store_url, credentials, cli.insecure_skip_tls_verify)
            .map_err(|error| anyhow::anyhow!(error.to_string()))?,
    );

    info!(
        version = app_version,
        started_at = %Utc::now().to_rfc3339(),
        store_url = %cli.store_url,
        collection = %cli.collection,
        "csv-search-server boot"
    );

    // The store may still be starting; wait for it before serving traffic.
    // Exhausting the retry budget here is fatal, the process never serves
    // ingestion requests against an unreachable store.
    let created = ensure_collection(
        store.as_ref(),
        &cli.collection,
        &CollectionSchema::default_text(),
        &RetryPolicy::default(),
    )
    .await
    .map_err(|error| anyhow::anyhow!(error.to_string()))?;

    if created {
        info!(collection = %cli.collection, "collection bootstrapped with default schema");
    }

    server::run(store, cli.collection, &cli.bind).await
}
