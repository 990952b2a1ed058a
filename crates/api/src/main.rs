use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trinity_api::config::ServerConfig;
use trinity_api::middleware::access_log::AccessLogWriter;
use trinity_api::router::build_app_router;
use trinity_api::state::AppState;
use trinity_worker::{RunnerConfig, ScanRunner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "trinity_api=debug,trinity_worker=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env().context("Invalid server configuration")?;
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = trinity_db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connection pool created");

    trinity_db::health_check(&pool)
        .await
        .context("Database health check failed")?;

    trinity_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    // --- Scan runner ---
    let runner_config = RunnerConfig::from_env().context("Invalid scan runner configuration")?;
    if runner_config.dry_run {
        tracing::warn!("DRY_RUN enabled: scans will be simulated");
    }
    let scan_runner = ScanRunner::new(pool.clone(), runner_config);
    let orphaned = scan_runner
        .fail_orphaned()
        .await
        .context("Failed to reconcile unfinished scans")?;
    if orphaned > 0 {
        tracing::warn!(orphaned, "Marked scans left over from a previous run as failed");
    }

    // --- Access log ---
    let access_log = match &config.access_log_path {
        Some(path) => {
            let writer = AccessLogWriter::open(path)
                .await
                .with_context(|| format!("Failed to open access log {}", path.display()))?;
            tracing::info!(path = %path.display(), "Writing access log");
            Some(Arc::new(writer))
        }
        None => None,
    };

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        scan_runner,
    };

    let app = build_app_router(state, &config, access_log);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().context("Invalid HOST address")?,
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
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
            Ok(mut sig) => {
                sig.recv().await;
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
