//! Tabular Data API server.
//!
//! # Usage
//!
//! ```bash
//! # Start with defaults (0.0.0.0:8000, `sample` dataset seeded)
//! tabular-api
//!
//! # Custom port, no sample, preload a dataset from a JSON array of objects
//! tabular-api --port 9000 --no-sample --load people=./people.json
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tabular_api::ingestion::ingest_records_from_path;
use tabular_api::observability::{CompositeObserver, StoreObserver, TracingObserver};
use tabular_api::server::{AppState, HttpServer, ServerConfig};
use tabular_api::store::{DatasetStore, StoreOptions};

/// Tabular Data API
#[derive(Parser, Debug)]
#[command(name = "tabular-api", version, about = "In-memory tabular dataset service")]
struct Args {
    /// Host address to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0", env = "TABULAR_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short = 'p', long, default_value_t = 8000, env = "TABULAR_PORT")]
    port: u16,

    /// Allowed CORS origin (repeatable). Without any, every origin is allowed.
    #[arg(long = "cors-origin", value_name = "ORIGIN")]
    cors_origins: Vec<String>,

    /// Largest accepted request body, in bytes
    #[arg(long, default_value_t = 16 * 1024 * 1024, env = "TABULAR_MAX_BODY_BYTES")]
    max_body_bytes: usize,

    /// Do not seed the `sample` dataset
    #[arg(long)]
    no_sample: bool,

    /// Preload a dataset from a JSON file: NAME=PATH (repeatable)
    #[arg(long = "load", value_name = "NAME=PATH")]
    load: Vec<String>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", env = "TABULAR_LOG_LEVEL")]
    log_level: String,

    /// Print configuration and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args);

    let config = load_config(&args);
    if args.print_config {
        println!("{}", config.to_json()?);
        return Ok(());
    }

    let store = build_store(&config, &args.load)?;
    info!(datasets = store.len(), "dataset store ready");

    let server = HttpServer::new(config, AppState::new(store));
    info!("Starting tabular API on {}", server.socket_addr());
    server
        .start(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Server stopped");
    Ok(())
}

fn init_logging(args: &Args) {
    let level = if args.verbose {
        "debug"
    } else {
        args.log_level.as_str()
    };

    let filter = EnvFilter::try_new(format!("tabular_api={level},tower_http={level}"))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

fn load_config(args: &Args) -> ServerConfig {
    ServerConfig {
        host: args.host.clone(),
        port: args.port,
        cors_origins: args.cors_origins.clone(),
        max_body_bytes: args.max_body_bytes,
        seed_sample: !args.no_sample,
    }
}

fn build_store(config: &ServerConfig, loads: &[String]) -> Result<DatasetStore> {
    let observers: Vec<Arc<dyn StoreObserver>> = vec![Arc::new(TracingObserver)];
    let options = StoreOptions {
        observer: Some(Arc::new(CompositeObserver::new(observers))),
        ..Default::default()
    };
    let mut store = DatasetStore::with_options(options);
    if config.seed_sample {
        store = store.with_sample();
    }

    for entry in loads {
        let (name, path) = entry
            .split_once('=')
            .ok_or_else(|| anyhow!("--load expects NAME=PATH, got '{entry}'"))?;
        let path = PathBuf::from(path);
        let dataset = ingest_records_from_path(&path)
            .with_context(|| format!("Failed to load dataset '{name}' from {}", path.display()))?;
        let summary = store.insert(name, dataset);
        info!(dataset = name, rows = summary.shape.0, columns = summary.shape.1, "preloaded dataset");
    }

    Ok(store)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
