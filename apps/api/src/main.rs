mod analysis;
mod config;
mod db;
mod errors;
mod files;
mod llm_client;
mod models;
mod routes;
mod state;
mod storage;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::RwLock;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::text::PdfTextExtractor;
use crate::config::{Config, StorageConfig};
use crate::db::create_pool;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::{LocalStorage, S3Storage, StorageGateway};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Screener API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize document storage
    let storage = build_storage(&config).await?;

    let http = llm_client::http_client().context("Failed to build HTTP client")?;
    if config.llm_api_key.is_none() {
        warn!("LLM_API_KEY is not set; runs are rejected until a key is submitted");
    }
    info!(
        "LLM endpoint {} (model: {}), match threshold {}%",
        config.llm_api_url, config.llm_model, config.match_threshold
    );

    // Build app state
    let state = AppState {
        db,
        storage,
        text_extractor: Arc::new(PdfTextExtractor),
        http,
        llm_api_key: Arc::new(RwLock::new(config.llm_api_key.clone())),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs the storage gateway selected by `STORAGE_BACKEND`.
async fn build_storage(config: &Config) -> Result<Arc<dyn StorageGateway>> {
    match &config.storage {
        StorageConfig::S3 {
            bucket,
            endpoint,
            region,
            access_key_id,
            secret_access_key,
        } => {
            let s3 =
                S3Storage::connect(endpoint, region, bucket, access_key_id, secret_access_key)
                    .await;
            s3.ensure_bucket(region)
                .await
                .context("Failed to prepare S3 bucket")?;
            info!("S3 storage initialized (bucket: {bucket})");
            Ok(Arc::new(s3))
        }
        StorageConfig::Local { root } => {
            let local = LocalStorage::new(root.clone())
                .await
                .with_context(|| format!("Failed to open storage dir {}", root.display()))?;
            info!("Local storage initialized at {}", root.display());
            Ok(Arc::new(local))
        }
    }
}
