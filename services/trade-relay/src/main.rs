//! Trade Relay - Main Entry Point

use anyhow::Result;
use clap::{Arg, Command, value_parser};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trade_relay::{RelayConfig, start_server};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trade_relay=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse command line arguments
    let matches = Command::new("trade-relay")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Relays trading terminal snapshots to a browser dashboard")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("relay.toml"),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("Listening port, overrides configuration")
                .value_parser(value_parser!(u16)),
        )
        .arg(
            Arg::new("routes")
                .long("routes")
                .help("Print available routes and exit")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    if matches.get_flag("routes") {
        trade_relay::server::print_routes();
        return Ok(());
    }

    let config_path = matches
        .get_one::<String>("config")
        .map_or("relay.toml", String::as_str);
    let mut config = match RelayConfig::load(config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Refusing to start: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(port) = matches.get_one::<u16>("port") {
        config.server.port = *port;
    }

    info!("Starting trade relay v{}", env!("CARGO_PKG_VERSION"));
    info!("Server will bind to: {}", config.server_address());
    info!("Ingest key header: {}", config.auth.header_name);
    match &config.dashboard.static_dir {
        Some(dir) => info!("Dashboard: static files from {}", dir.display()),
        None => info!("Dashboard: embedded page"),
    }
    info!("Features enabled:");
    info!("  CORS: {}", config.cors.enabled);
    info!("  Compression: {}", config.server.compression);

    if let Err(e) = start_server(config).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
