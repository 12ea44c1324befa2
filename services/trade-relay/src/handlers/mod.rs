//! HTTP request handlers

pub mod health;
pub mod trades;

pub use health::health_check;
pub use trades::{get_data, get_stats, ingest_trades};
