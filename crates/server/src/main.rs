//! Folio server
//!
//! REST backend for the portfolio content application.

use std::sync::Arc;

use clap::Parser;
use folio_persistence::backends::memory::MemoryBackend;
use folio_persistence::core::{DocumentStore, ResourceStores};
use folio_rest::identity::verifier_from_config;
use folio_rest::{ServerConfig, StorageBackendMode, create_app_with_config, init_logging};
use tracing::info;

#[cfg(feature = "sqlite")]
use folio_persistence::backends::sqlite::{SqliteBackend, SqliteBackendConfig};

/// Default SQLite database file when no URL is configured.
#[cfg(feature = "sqlite")]
const DEFAULT_SQLITE_PATH: &str = "folio.db";

/// Creates a SQLite backend from the server configuration.
#[cfg(feature = "sqlite")]
fn create_sqlite_backend(config: &ServerConfig) -> anyhow::Result<SqliteBackend> {
    let db_path = config
        .database_url
        .as_deref()
        .unwrap_or(DEFAULT_SQLITE_PATH);
    info!(database = %db_path, "Initializing SQLite backend");

    Ok(SqliteBackend::with_config(
        db_path,
        SqliteBackendConfig::default(),
    )?)
}

/// Starts the Axum HTTP server.
async fn serve(app: axum::Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr();
    info!(address = %addr, "Server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Initializes every collection over `backend` and serves the API.
///
/// The backend handle is opened once here and shared by every resource kind.
async fn run(backend: Arc<dyn DocumentStore>, config: ServerConfig) -> anyhow::Result<()> {
    backend.health_check().await?;

    let stores = ResourceStores::new(backend, config.filter_policy());
    stores.initialize_all().await?;

    let verifier = verifier_from_config(&config);
    let app = create_app_with_config(stores, config.clone(), verifier);
    serve(app, &config).await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    let backend_mode = config
        .storage_backend_mode()
        .map_err(|e| anyhow::anyhow!("Invalid storage backend configuration: {}", e))?;

    info!(
        port = config.port,
        host = %config.host,
        storage_backend = %backend_mode,
        legacy_id_fallback = config.legacy_id_fallback,
        "Starting Folio server"
    );

    match backend_mode {
        StorageBackendMode::Memory => {
            start_memory(config).await?;
        }
        StorageBackendMode::Sqlite => {
            start_sqlite(config).await?;
        }
        StorageBackendMode::MongoDB => {
            start_mongodb(config).await?;
        }
    }

    Ok(())
}

/// Starts the server with the in-memory backend. Data is lost on exit.
async fn start_memory(config: ServerConfig) -> anyhow::Result<()> {
    info!("Using in-memory backend; data will not survive a restart");
    run(Arc::new(MemoryBackend::new()), config).await
}

/// Starts the server with the SQLite backend.
#[cfg(feature = "sqlite")]
async fn start_sqlite(config: ServerConfig) -> anyhow::Result<()> {
    let backend = create_sqlite_backend(&config)?;
    run(Arc::new(backend), config).await
}

/// Fallback when sqlite feature is not enabled.
#[cfg(not(feature = "sqlite"))]
async fn start_sqlite(_config: ServerConfig) -> anyhow::Result<()> {
    anyhow::bail!(
        "The sqlite backend requires the 'sqlite' feature. \
         Build with: cargo build -p folio-server --features sqlite"
    )
}

/// Starts the server with the MongoDB backend.
#[cfg(feature = "mongodb")]
async fn start_mongodb(config: ServerConfig) -> anyhow::Result<()> {
    use folio_persistence::backends::mongo::{MongoBackend, MongoBackendConfig};

    let uri = config
        .database_url
        .clone()
        .ok_or_else(|| anyhow::anyhow!("MongoDB backend requires --database-url"))?;

    info!(database = %config.database_name, "Connecting to MongoDB");
    let backend_config =
        MongoBackendConfig::new(uri).with_database_name(config.database_name.clone());
    let backend = MongoBackend::connect(backend_config).await?;
    info!("Connected to MongoDB");

    run(Arc::new(backend), config).await
}

/// Fallback when mongodb feature is not enabled.
#[cfg(not(feature = "mongodb"))]
async fn start_mongodb(_config: ServerConfig) -> anyhow::Result<()> {
    anyhow::bail!(
        "The mongodb backend requires the 'mongodb' feature. \
         Build with: cargo build -p folio-server --features mongodb"
    )
}
