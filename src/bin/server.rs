//! WasteTrack HTTP Server
//!
//! Serves the product catalog, waste ledger and reports over HTTP.
//!
//! # Configuration
//!
//! Environment variables:
//! - `WASTETRACK_CONFIG`: Path to config file (default: ~/.config/wastetrack/config.yaml)
//! - `WASTETRACK_DATA_PATH`: JSON data file (default: ~/.local/share/wastetrack/db.json)
//! - `WASTETRACK_CATALOG_PATH`: Seed catalog used on first run (default: built-in)
//! - `WASTETRACK_PORT`: Port to listen on (default: 8080)
//!
//! # Endpoints
//!
//! - `GET /health`: Health check
//! - `GET|POST|DELETE /api/products`: Product catalog
//! - `GET|POST|DELETE /api/waste`: Waste entries
//! - `GET /api/report?start=&end=&format=csv`: Cost report

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wastetrack::server::build_router;
use wastetrack::Config;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wastetrack=info,wastetrack_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config_path = std::env::var("WASTETRACK_CONFIG").ok().map(PathBuf::from);
    let config = Config::load(config_path)?;

    tracing::info!("Data file: {}", config.data_path.value.display());
    if let Some(path) = &config.config_file {
        tracing::info!("Config file: {}", path.display());
    }

    let store = Arc::new(config.open_store()?);

    // Seeds the data file on first run
    let products = store.load()?.products.len();
    tracing::info!("Catalog holds {} product(s)", products);

    let app = build_router(store).layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port.value));
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
