use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use tokio_util::sync::CancellationToken;

use tixer_api::config::AppConfig;
use tixer_api::logging;
use tixer_api::router::build_app_router;
use tixer_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Configuration ---
    let config = AppConfig::from_env().context("Failed to load configuration")?;

    // --- Tracing ---
    logging::init(config.environment).context("Failed to install tracing subscriber")?;
    tracing::info!(
        environment = %config.environment,
        host = %config.server.host,
        port = config.server.port,
        "Loaded configuration",
    );

    // --- Database ---
    let pool = tixer_db::create_pool(&config.database.pool)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connection pool created");

    tixer_db::health_check(&pool)
        .await
        .context("Database health check failed")?;
    tracing::info!("Database health check passed");

    tixer_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    // --- App state ---
    let addr = SocketAddr::new(
        config.server.host.parse().context("Invalid HOST address")?,
        config.server.port,
    );
    let grace = Duration::from_secs(config.server.shutdown_timeout_secs);
    let server_config = config.server.clone();
    let state = AppState::new(pool.clone(), config);
    let root_token = state.shutdown.clone();

    // --- Router ---
    let app = build_app_router(state, &server_config).context("Invalid server configuration")?;

    // --- Start server ---
    tracing::info!(%addr, "Starting server");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            tokio::spawn(force_cancel_after(grace, root_token));
        })
        .await
        .context("Server error")?;

    // --- Post-shutdown cleanup ---
    pool.close().await;
    tracing::info!("Graceful shutdown complete");

    Ok(())
}

/// Cancel every outstanding request scope once the drain window has passed.
async fn force_cancel_after(grace: Duration, root: CancellationToken) {
    tokio::time::sleep(grace).await;
    tracing::warn!(
        grace_secs = grace.as_secs(),
        "Shutdown grace period elapsed, cancelling in-flight requests",
    );
    root.cancel();
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix). If a handler cannot
/// be installed the error is logged and that signal is ignored.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
