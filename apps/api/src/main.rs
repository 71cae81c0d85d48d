mod config;
mod editing;
mod errors;
mod export;
mod extraction;
mod layout;
mod models;
mod render;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::Config;
use crate::editing::session::ReportSession;
use crate::editing::store::{FileSnapshotStore, RedisSnapshotStore, SnapshotStore};
use crate::export::ExportConfig;
use crate::extraction::GeminiClient;
use crate::routes::build_router;
use crate::state::{AppState, BusyFlag};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Report API v{}", env!("CARGO_PKG_VERSION"));

    // Snapshot persistence: Redis when configured, a local file otherwise
    let store: Arc<dyn SnapshotStore> = match &config.redis_url {
        Some(url) => {
            let store = RedisSnapshotStore::open(url)?;
            info!("Redis snapshot store initialized");
            Arc::new(store)
        }
        None => {
            let store = FileSnapshotStore::new(&config.snapshot_dir);
            info!("File snapshot store at {}", store.path().display());
            Arc::new(store)
        }
    };

    let mut session = ReportSession::new(store);
    if session.restore().await.is_none() {
        info!("No persisted report; starting in upload state");
    }

    let extractor = GeminiClient::new(config.gemini_api_key.clone())?;
    if extractor.has_credential() {
        info!("Extraction client initialized (model: {})", extraction::client::MODEL);
    } else {
        warn!("GEMINI_API_KEY is not set; extraction requests will be rejected");
    }

    let state = AppState {
        config: config.clone(),
        session: Arc::new(Mutex::new(session)),
        extractor: Arc::new(extractor),
        export: ExportConfig::default(),
        export_busy: BusyFlag::default(),
        extraction_busy: BusyFlag::default(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
