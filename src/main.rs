use gasledger::api;
use gasledger::archive::Archive;
use gasledger::clock::SystemClock;
use gasledger::config::{Config, StoreBackend};
use gasledger::domain::Tariff;
use gasledger::ledger::Ledger;
use gasledger::store::{CsvStore, SqliteStore, TransactionStore};
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let port = config.port;

    // Open the configured store backend
    let store: Arc<dyn TransactionStore> = match config.store_backend {
        StoreBackend::Sqlite => match SqliteStore::open(&config.store_path).await {
            Ok(s) => Arc::new(s),
            Err(e) => {
                eprintln!("Failed to open sqlite store: {}", e);
                std::process::exit(1);
            }
        },
        StoreBackend::Csv => match CsvStore::open(&config.store_path) {
            Ok(s) => Arc::new(s),
            Err(e) => {
                eprintln!("Failed to open csv store: {}", e);
                std::process::exit(1);
            }
        },
    };

    let archive = Archive::new(&config.archive_dir);
    let ledger = Arc::new(Ledger::new(store, archive, Tariff::standard()));

    // Create router
    let app = api::create_router(api::AppState::new(ledger, Arc::new(SystemClock)));

    // Bind to address
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("Server listening on {}", addr);

    // Run server
    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}
