//! Trade Relay
//!
//! In-memory relay between a trading terminal and a browser dashboard.
//! Features:
//! - Snapshot ingest guarded by a pre-shared API key
//! - Latest account, trade and position snapshot served verbatim
//! - Trade statistics recomputed on every query in exact decimal arithmetic
//! - Embedded dashboard page, or a static front-end directory

#![allow(missing_docs)]

use anyhow::Result;

pub mod config;
pub mod dashboard;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod server;
pub mod stats;
pub mod store;

pub use config::{AuthConfig, CorsConfig, DashboardConfig, RelayConfig, ServerConfig};
pub use error::RelayError;
pub use server::{AppState, RelayServer, build_router};
pub use stats::{StatsSummary, TradeStats, compute_stats};
pub use store::SnapshotStore;

/// Start the relay server
pub async fn start_server(config: RelayConfig) -> Result<()> {
    RelayServer::new(config).start().await
}
