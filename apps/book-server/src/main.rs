//! Book store REST API server.
//!
//! Opens the book collection, wires the repository into the router,
//! and serves until Ctrl+C.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use book_store_api::{router::Router, server::Server};
use book_store_core::config::BookStoreConfig;
use book_store_core::document::DocumentStore;
use book_store_core::DocumentBookRepository;
use clap::Parser;
use tokio::signal;
use tracing_subscriber::EnvFilter;

/// Command-line arguments for the book server.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = 8989)]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Data directory for collection snapshots (in-memory if omitted)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Collection name
    #[arg(long, default_value = "book")]
    collection: String,

    /// Request timeout in milliseconds
    #[arg(long, default_value_t = 5000)]
    request_timeout_ms: u64,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Arc::new(BookStoreConfig {
        collection: args.collection.clone(),
        data_dir: args.data_dir.clone(),
        request_timeout_ms: args.request_timeout_ms,
        ..Default::default()
    });

    let store = DocumentStore::open(&config).with_context(|| {
        format!("Failed to open collection '{}'", config.collection)
    })?;
    if !store.is_persistent() {
        tracing::warn!("No --data-dir given, books are kept in memory only");
    }
    let repository = Arc::new(DocumentBookRepository::new(Arc::new(store)));

    let router = Router::new(repository, config);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", args.host, args.port))?;
    let server = Server::bind(addr, router)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(
        host = %args.host,
        port = args.port,
        collection = %args.collection,
        request_timeout_ms = args.request_timeout_ms,
        "Starting book server"
    );

    server
        .serve_with_shutdown(async {
            if let Err(e) = signal::ctrl_c().await {
                tracing::error!("Failed to listen for ctrl_c: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}
