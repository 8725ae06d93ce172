//! uasa-api - class roster service entry point
//!
//! Startup order: configuration → tracing → record store → HTTP server.
//! On Ctrl+C or SIGTERM the server drains in-flight requests, then the store
//! is closed.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uasa_api::{build_router, AppState};
use uasa_common::config::{Config, ConfigOverrides};
use uasa_common::{ClassStore, SqliteClassStore};

/// Command-line arguments for uasa-api
#[derive(Parser, Debug)]
#[command(name = "uasa-api")]
#[command(about = "Class roster and marks service")]
#[command(version)]
struct Args {
    /// TOML config file
    #[arg(short, long, env = "UASA_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on (host:port)
    #[arg(short, long, env = "UASA_BIND")]
    bind: Option<String>,

    /// SQLite database file
    #[arg(short, long, env = "UASA_DATABASE")]
    database: Option<PathBuf>,

    /// Directory for temporary uploaded rosters
    #[arg(long, env = "UASA_UPLOAD_DIR")]
    upload_dir: Option<PathBuf>,

    /// Directory served as static files
    #[arg(long, env = "UASA_STATIC_DIR")]
    static_dir: Option<PathBuf>,
}

impl From<Args> for ConfigOverrides {
    fn from(args: Args) -> Self {
        Self {
            config_file: args.config,
            bind: args.bind,
            database_path: args.database,
            upload_dir: args.upload_dir,
            static_dir: args.static_dir,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load(args.into()).context("Failed to load configuration")?;

    // RUST_LOG wins over the configured level
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(log_directive(&config.log_level)))
                .context("Invalid log level")?,
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting UASA roster service (uasa-api) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    match &config.config_file {
        Some(path) => info!("Configuration: {}", path.display()),
        None => warn!("No config file found, using defaults"),
    }
    info!("Database path: {}", config.database_path.display());
    info!("Upload directory: {}", config.upload_dir.display());
    info!("Static directory: {}", config.static_dir.display());

    let store = Arc::new(
        SqliteClassStore::open(&config.database_path)
            .await
            .context("Failed to open database")?,
    );
    info!("✓ Connected to database");

    let state = AppState::new(store.clone(), &config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind))?;
    info!("uasa-api listening on http://{}", config.bind);
    info!("Health check: http://{}/health", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    store.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Expand a bare level ("debug") into per-crate directives
///
/// Anything that already looks like a filter directive is used verbatim.
fn log_directive(level: &str) -> String {
    if level.contains('=') || level.contains(',') {
        level.to_string()
    } else {
        format!("uasa_api={0},uasa_common={0},tower_http={0}", level)
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_level_expands_per_crate() {
        assert_eq!(
            log_directive("debug"),
            "uasa_api=debug,uasa_common=debug,tower_http=debug"
        );
    }

    #[test]
    fn test_directive_used_verbatim() {
        assert_eq!(log_directive("uasa_api=trace"), "uasa_api=trace");
        assert_eq!(log_directive("info,sqlx=warn"), "info,sqlx=warn");
    }

    #[test]
    fn test_args_map_to_overrides() {
        let args = Args::parse_from(["uasa-api", "--bind", "0.0.0.0:8080", "--database", "/tmp/k.db"]);
        let overrides = ConfigOverrides::from(args);
        assert_eq!(overrides.bind.as_deref(), Some("0.0.0.0:8080"));
        assert_eq!(overrides.database_path, Some(PathBuf::from("/tmp/k.db")));
        assert_eq!(overrides.upload_dir, None);
    }
}
