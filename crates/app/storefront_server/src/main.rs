//! Storefront API server binary.
//!
//! Reads configuration from the environment (and `.env`), applies CLI
//! overrides, and serves the REST API until Ctrl-C / SIGTERM.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use storefront_api::config::{ApiConfig, StorageKind};
use storefront_api::{AppState, router};

/// CLI arguments. Each falls back to its environment variable.
#[derive(Parser, Debug)]
#[command(name = "storefront_server", about = "Storefront REST API server")]
struct Args {
    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,

    /// Interface to bind.
    #[arg(long, env = "BIND_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Storage backend: `postgres` or `memory`.
    #[arg(long, env = "STORAGE", default_value = "postgres")]
    storage: StorageKind,

    /// PostgreSQL connection URL.
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "postgres://localhost:5432/storefront"
    )]
    database_url: String,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,

    /// Directory for uploaded product images.
    #[arg(long, env = "UPLOAD_DIR")]
    upload_dir: Option<PathBuf>,

    /// Skip running embedded migrations on startup.
    #[arg(long, default_value_t = false)]
    skip_migrations: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(
                    "info,storefront_api=debug,storefront_core=debug,tower_http=info",
                )
            }),
        )
        .init();

    let args = Args::parse();

    let mut config = ApiConfig::from_env();
    config.bind_addr = format!("{}:{}", args.host, args.port);
    config.storage = args.storage;
    config.database_url = args.database_url.clone();
    if let Some(dir) = args.upload_dir {
        config.upload_dir = dir;
    }

    info!(?config, "starting storefront_server");

    let state = match config.storage {
        StorageKind::Memory => {
            info!("using in-memory storage; data is lost on exit");
            AppState::in_memory(config.clone())
        }
        StorageKind::Postgres => {
            info!(max_connections = args.max_connections, "configuring connection pool");
            let pool = PgPoolOptions::new()
                .max_connections(args.max_connections)
                .acquire_timeout(Duration::from_secs(30))
                .connect(&config.database_url)
                .await?;

            if args.skip_migrations {
                info!("skipping database migrations");
            } else {
                storefront_api::migrate(&pool).await?;
            }

            tokio::fs::create_dir_all(&config.upload_dir).await?;
            AppState::postgres(config.clone(), pool)
        }
    };

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;
    info!(addr = %local_addr, "REST API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
