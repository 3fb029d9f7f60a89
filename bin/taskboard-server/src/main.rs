//! taskboard-server – entry point.
//!
//! Startup order:
//! 1. Parse configuration from environment variables (and `.env`).
//! 2. Initialise structured tracing (JSON or pretty).
//! 3. Build the in-memory store, seeded unless disabled.
//! 4. Build the Axum router and start the HTTP server with graceful shutdown.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn};

use taskboard_server::{build, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Configuration ───────────────────────────────────────────────────────
    let cfg = Config::from_env();

    // ── 2. Tracing ─────────────────────────────────────────────────────────────
    let env_filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) => match cfg.log_level.parse::<tracing_subscriber::EnvFilter>() {
            Ok(f) => f,
            Err(e) => {
                eprintln!(
                    "WARN: TASKBOARD_LOG='{}' is not a valid tracing filter ({}); \
                     falling back to 'info'",
                    cfg.log_level, e
                );
                tracing_subscriber::EnvFilter::new("info")
            }
        },
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_thread_ids(true);

    if cfg.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    info!(version = env!("CARGO_PKG_VERSION"), "taskboard-server starting");

    // ── 3. Shared application state ────────────────────────────────────────────
    let state = Arc::new(AppState::new(cfg.clone()).await);
    info!(
        tasks = state.store.tasks.len().await,
        projects = state.store.projects.len().await,
        development = cfg.development,
        "store ready"
    );

    // ── 4. HTTP server with graceful shutdown ──────────────────────────────────
    let app = build(Arc::clone(&state));
    let addr: SocketAddr = cfg.bind_address.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, origins = ?cfg.cors_allowed_origins, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("taskboard-server stopped");
    Ok(())
}

/// Returns a future that resolves when SIGINT (Ctrl-C) or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install CTRL+C signal handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => warn!(error = %e, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c    => {}
        _ = terminate => {}
    }

    info!("shutdown signal received; starting graceful shutdown");
}
