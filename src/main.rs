//! Record Cache - a cache-aside HTTP front for structured records
//!
//! Serves typed records with per-entry TTL from an in-memory or Redis
//! backing store.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use record_cache::api::create_router;
use record_cache::cache::{CacheBackend, MemoryBackend, RedisBackend};
use record_cache::config::{BackendKind, Config};
use record_cache::{spawn_cleanup_task, AppState};

/// Main entry point for the record cache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the configured backing store (and its sweeper for memory)
/// 4. Create Axum router with all endpoints
/// 5. Start HTTP server on configured port
/// 6. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "record_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting record cache server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: backend={:?}, default_ttl={}s, port={}, timeout={}ms",
        config.backend, config.default_ttl, config.server_port, config.operation_timeout_ms
    );

    let (backend, cleanup_handle) = build_backend(&config)?;
    let state = AppState::from_config(&config, backend);

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Builds the configured backing store.
///
/// The memory backend gets a background sweeper; Redis expires keys itself.
fn build_backend(
    config: &Config,
) -> anyhow::Result<(Arc<dyn CacheBackend>, Option<JoinHandle<()>>)> {
    match config.backend {
        BackendKind::Memory => {
            let memory = Arc::new(MemoryBackend::new(config.max_entries));
            let handle = spawn_cleanup_task(memory.clone(), config.cleanup_interval);
            info!(max_entries = config.max_entries, "Memory backend initialized");
            let backend: Arc<dyn CacheBackend> = memory;
            Ok((backend, Some(handle)))
        }
        BackendKind::Redis => {
            let backend = RedisBackend::open(&config.redis_url)
                .context("invalid REDIS_CONNECTIONSTRING")?;
            info!(url = %config.redis_url, "Redis backend initialized");
            let backend: Arc<dyn CacheBackend> = Arc::new(backend);
            Ok((backend, None))
        }
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the cleanup task and allows graceful shutdown.
async fn shutdown_signal(cleanup_handle: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
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
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    if let Some(handle) = cleanup_handle {
        handle.abort();
        warn!("Cleanup task aborted");
    }
}
