//! Marketplace Binary
//!
//! Starts the marketplace HTTP service.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin marketplace
//! ```
//!
//! # Environment Variables
//!
//! - `MARKETPLACE_CONFIG`: YAML config path (default: `config.yaml`, built-in
//!   defaults when absent)
//! - `RUST_LOG`: log filter, overrides `observability.logging.level`
//! - `OTEL_ENABLED`: export spans over OTLP (default: false)

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::Router;
use marketplace::config::{CONFIG_PATH_ENV, Config, load_config};
use marketplace::infrastructure::config::Container;
use marketplace::infrastructure::http::create_router;
use marketplace::infrastructure::persistence::SqliteStore;
use marketplace::observability::{MetricsConfig, init_metrics};
use marketplace::telemetry::init_telemetry;
use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::sync::CancellationToken;

/// Graceful shutdown timeout.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    let config_path = std::env::var(CONFIG_PATH_ENV).ok();
    let config = load_config(config_path.as_deref()).context("failed to load configuration")?;

    let _telemetry = init_telemetry(&config.observability.logging);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting marketplace");
    log_config(&config);

    start_metrics(&config)?;

    let store = Arc::new(
        SqliteStore::connect(&config.persistence)
            .await
            .context("failed to open database")?,
    );
    let container = Container::new(Arc::clone(&store), &config);
    bootstrap_admin(&container, &config).await?;

    let app = create_router(container.app_state(env!("CARGO_PKG_VERSION")));
    serve(&config, app).await?;

    store.close().await;
    tracing::info!("Marketplace stopped");
    Ok(())
}

/// Load .env file from current or ancestor directories.
fn load_dotenv() {
    if dotenvy::dotenv().is_err() {
        load_dotenv_from_ancestors();
    }
}

/// Log the loaded configuration.
fn log_config(config: &Config) {
    tracing::info!(
        http_addr = %config.server.http_addr(),
        database_url = %config.persistence.database_url,
        max_connections = config.persistence.max_connections,
        token_ttl_secs = config.auth.token_ttl_secs,
        showcase_cache_ttl_secs = config.catalog.showcase_cache_ttl_secs,
        metrics_enabled = config.observability.metrics.enabled,
        "Configuration loaded"
    );
}

/// Start the Prometheus exporter when enabled.
fn start_metrics(config: &Config) -> anyhow::Result<()> {
    let settings = &config.observability.metrics;
    if !settings.enabled {
        return Ok(());
    }
    let addr: SocketAddr = settings
        .listen_addr
        .parse()
        .with_context(|| format!("invalid metrics address {}", settings.listen_addr))?;
    init_metrics(&MetricsConfig::with_addr(addr))?;
    Ok(())
}

/// Create the configured staff account if it does not exist yet.
async fn bootstrap_admin(container: &Container<SqliteStore>, config: &Config) -> anyhow::Result<()> {
    let Some(admin) = &config.auth.bootstrap_admin else {
        return Ok(());
    };
    let created = container
        .session_use_case()
        .ensure_staff_account(&admin.username, &admin.password)
        .await
        .context("failed to create bootstrap staff account")?;
    if !created {
        tracing::debug!(username = %admin.username, "Bootstrap staff account already exists");
    }
    Ok(())
}

/// Serve HTTP until a shutdown signal, then drain within [`SHUTDOWN_TIMEOUT`].
async fn serve(config: &Config, app: Router) -> anyhow::Result<()> {
    let http_addr = config.server.http_addr();
    let listener = TcpListener::bind(&http_addr)
        .await
        .with_context(|| format!("failed to bind {http_addr}"))?;

    tracing::info!(%http_addr, "HTTP server starting");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health");
    tracing::info!("  POST /api/v1/auth/{{register,login,logout}}");
    tracing::info!("  *    /api/v1/{{profile,items,shops,promotions,offers}}");
    tracing::info!("  *    /api/v1/{{cart,orders}}");
    tracing::info!("  *    /api/v1/admin");

    let shutdown = CancellationToken::new();
    let drain = shutdown.clone();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move { drain.cancelled().await })
            .await
    });

    tokio::select! {
        result = &mut server => {
            result.context("HTTP server task failed")??;
            tracing::info!("HTTP server stopped");
            return Ok(());
        }
        () = shutdown_signal() => {}
    }

    shutdown.cancel();
    tracing::info!(
        timeout_secs = SHUTDOWN_TIMEOUT.as_secs(),
        "Graceful shutdown started"
    );

    match tokio::time::timeout(SHUTDOWN_TIMEOUT, server).await {
        Ok(result) => {
            result.context("HTTP server task failed")??;
            tracing::info!("HTTP server stopped");
        }
        Err(_) => tracing::warn!("Graceful shutdown timed out, dropping open connections"),
    }
    Ok(())
}

/// Load .env file from current directory or any ancestor directory.
fn load_dotenv_from_ancestors() {
    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
///
/// # Panics
///
/// Panics if signal handlers cannot be installed.
#[allow(clippy::expect_used)]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }
}
