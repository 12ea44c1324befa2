//! Relay server: router assembly and lifecycle

use anyhow::Result;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware,
    routing::{get, post},
};
use std::{
    net::SocketAddr,
    sync::Arc,
    time::{Duration, Instant},
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    services::{ServeDir, ServeFile},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info, warn};

use crate::{
    config::RelayConfig,
    dashboard::dashboard_page,
    handlers::{get_data, get_stats, health_check, ingest_trades},
    middleware::{ApiKeyState, api_key_middleware, create_cors_layer, handle_panic, logging_middleware},
    store::SnapshotStore,
};

pub const INGEST_PATH: &str = "/api/trades";
pub const DATA_PATH: &str = "/api/data";
pub const STATS_PATH: &str = "/api/stats";
pub const HEALTH_PATH: &str = "/health";

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SnapshotStore>,
    pub start_time: Instant,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<SnapshotStore>) -> Self {
        Self {
            store,
            start_time: Instant::now(),
        }
    }
}

/// Trade relay server
pub struct RelayServer {
    config: RelayConfig,
    store: Arc<SnapshotStore>,
}

impl RelayServer {
    /// Create a server with an empty snapshot store
    #[must_use]
    pub fn new(config: RelayConfig) -> Self {
        Self::with_store(config, Arc::new(SnapshotStore::new()))
    }

    /// Create a server around an existing store
    #[must_use]
    pub const fn with_store(config: RelayConfig, store: Arc<SnapshotStore>) -> Self {
        Self { config, store }
    }

    /// Start the server and run until Ctrl-C
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = match self.config.server_address().parse() {
            Ok(addr) => addr,
            Err(e) => {
                error!(
                    "Invalid server address '{}': {}",
                    self.config.server_address(),
                    e
                );
                return Err(anyhow::anyhow!("Invalid server address: {}", e));
            }
        };

        let app = build_router(AppState::new(Arc::clone(&self.store)), &self.config)?;

        let listener = match tokio::net::TcpListener::bind(addr).await {
            Ok(listener) => {
                info!("Trade relay listening on {}", addr);
                listener
            }
            Err(e) => {
                error!("Failed to bind TCP listener to {}: {}", addr, e);
                return Err(anyhow::anyhow!("Failed to bind to address {}: {}", addr, e));
            }
        };

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
        {
            error!("Server encountered a fatal error: {}", e);
            return Err(anyhow::anyhow!("Server error: {}", e));
        }

        info!("Trade relay stopped");
        Ok(())
    }
}

/// Build the router with all routes and middleware
pub fn build_router(state: AppState, config: &RelayConfig) -> Result<Router> {
    let api_key_state = ApiKeyState::from_config(config)?;

    // Key check applies to the ingest route only
    let ingest = Router::new()
        .route(INGEST_PATH, post(ingest_trades))
        .route_layer(middleware::from_fn_with_state(
            api_key_state,
            api_key_middleware,
        ));

    let mut app = Router::new()
        .route(DATA_PATH, get(get_data))
        .route(STATS_PATH, get(get_stats))
        .route(HEALTH_PATH, get(health_check))
        .merge(ingest);

    app = match &config.dashboard.static_dir {
        Some(dir) => {
            if !dir.is_dir() {
                warn!("Dashboard directory {} does not exist", dir.display());
            }
            info!("Serving dashboard from {}", dir.display());
            app.route_service("/", ServeFile::new(dir.join("index.html")))
                .fallback_service(ServeDir::new(dir))
        }
        None => app.route("/", get(dashboard_page)),
    };

    let mut app = app
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.server.timeout_seconds),
        ))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http());

    if config.server.compression {
        app = app.layer(CompressionLayer::new());
    }
    if config.cors.enabled {
        app = app.layer(create_cors_layer(config));
    }

    Ok(app)
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Failed to listen for shutdown signal: {}", e),
    }
}

/// API route documentation
pub fn print_routes() {
    println!("Trade Relay Routes:");
    println!("===================");
    println!();
    println!("Terminal ingest (API key header required):");
    println!("  POST {INGEST_PATH:<12} - Replace snapshot with account, trades, positions");
    println!();
    println!("Dashboard:");
    println!("  GET  {:<12} - Dashboard page", "/");
    println!("  GET  {DATA_PATH:<12} - Current snapshot");
    println!("  GET  {STATS_PATH:<12} - Account, trade statistics, last update");
    println!();
    println!("Monitoring:");
    println!("  GET  {HEALTH_PATH:<12} - Health check");
}
