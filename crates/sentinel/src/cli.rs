//! Command-line surface of `trinity-sentinel`.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use sqlx::PgPool;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use trinity_core::attendance::HealthSummary;

use crate::blacklist;
use crate::config::{manager_interval_secs, SentinelConfig};
use crate::manager::{self, SharedSummary};
use crate::monitor::Monitor;
use crate::server::{build_router, SentinelState};

#[derive(Debug, Parser)]
#[command(name = "trinity-sentinel")]
#[command(about = "Blue Trinity access-log defender and absence manager")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Count absences and write warning letters.
    Manager {
        /// Run a single pass and print the summary as JSON.
        #[arg(long)]
        once: bool,
        /// Seconds between passes.
        #[arg(long)]
        interval: Option<u64>,
    },
    /// Tail the access log and raise alerts.
    Monitor,
    /// Manager loop, monitor and HTTP server together.
    Run {
        #[arg(long)]
        interval: Option<u64>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// One manager pass, then serve the HTTP surface.
    Serve {
        #[arg(long)]
        port: Option<u16>,
    },
}

impl Cli {
    /// Fold CLI overrides into `config`.
    pub fn apply(&self, config: &mut SentinelConfig) {
        match &self.command {
            Command::Manager { interval, .. } => {
                if let Some(secs) = interval {
                    config.manager_interval = manager_interval_secs(*secs);
                }
            }
            Command::Run { interval, port } => {
                if let Some(secs) = interval {
                    config.manager_interval = manager_interval_secs(*secs);
                }
                if let Some(port) = port {
                    config.port = *port;
                }
            }
            Command::Serve { port } => {
                if let Some(port) = port {
                    config.port = *port;
                }
            }
            Command::Monitor => {}
        }
    }
}

/// Create the data directory, reports directory and blacklist file.
pub async fn prepare(config: &SentinelConfig) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(&config.data_dir)
        .await
        .with_context(|| format!("Failed to create {}", config.data_dir.display()))?;
    tokio::fs::create_dir_all(config.reports_dir())
        .await
        .context("Failed to create reports directory")?;
    blacklist::ensure_file(&config.blacklist_path())
        .await
        .context("Failed to create blacklist")?;
    Ok(())
}

async fn connect(config: &SentinelConfig) -> anyhow::Result<PgPool> {
    let url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set for the manager")?;
    let pool = trinity_db::create_pool(url)
        .await
        .context("Failed to connect to database")?;
    Ok(pool)
}

async fn serve(
    config: &SentinelConfig,
    summary: SharedSummary,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let app = build_router(SentinelState {
        summary,
        blacklist_path: config.blacklist_path(),
    });
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(%addr, "Sentinel HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .context("Server error")?;
    Ok(())
}

/// Wait for a background loop. If it dies (panic or abort) the failure is
/// logged and `cancel` fires so the remaining tasks and the server stop too.
pub async fn watch_task(
    name: &'static str,
    handle: JoinHandle<()>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    match handle.await {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::error!(task = name, error = %e, "Background task failed");
            cancel.cancel();
            Err(anyhow::anyhow!("{name} task failed: {e}"))
        }
    }
}

/// Execute a parsed command until it finishes or `cancel` fires.
pub async fn execute(cli: Cli, config: SentinelConfig, cancel: CancellationToken) -> anyhow::Result<()> {
    prepare(&config).await?;
    let summary: SharedSummary = Arc::new(RwLock::new(HealthSummary::default()));

    match cli.command {
        Command::Manager { once: true, .. } => {
            let pool = connect(&config).await?;
            let result = manager::run_once(&pool, &config.reports_dir()).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Manager { once: false, .. } => {
            let pool = connect(&config).await?;
            manager::run_periodic(
                pool,
                config.reports_dir(),
                config.manager_interval,
                summary,
                cancel,
            )
            .await;
        }
        Command::Monitor => {
            let monitor = Monitor::from_config(&config).await?;
            monitor.run(config.poll_interval, cancel).await;
        }
        Command::Serve { .. } => {
            let pool = connect(&config).await?;
            *summary.write().await = manager::run_once(&pool, &config.reports_dir()).await?;
            serve(&config, summary, cancel).await?;
        }
        Command::Run { .. } => {
            let pool = connect(&config).await?;
            let monitor = Monitor::from_config(&config).await?;

            let manager_task = tokio::spawn(manager::run_periodic(
                pool,
                config.reports_dir(),
                config.manager_interval,
                Arc::clone(&summary),
                cancel.clone(),
            ));
            let monitor_task = tokio::spawn(monitor.run(config.poll_interval, cancel.clone()));

            let server = async {
                let served = serve(&config, summary, cancel.clone()).await;
                // Stop the background loops if the server exits on its own.
                cancel.cancel();
                served
            };
            let (served, manager_done, monitor_done) = tokio::join!(
                server,
                watch_task("manager", manager_task, cancel.clone()),
                watch_task("monitor", monitor_task, cancel.clone()),
            );
            served?;
            manager_done?;
            monitor_done?;
        }
    }
    Ok(())
}
