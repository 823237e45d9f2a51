//! Pingmon binary entry point.
//!
//! Drives the latency engine with a fixed 1-second tick and logs every
//! published reading. Core functionality is provided by the `pingmon`
//! library crate.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use clap::Parser;
use pingmon::{AppConfig, PingEngine};
use tokio::time::MissedTickBehavior;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Driver tick cadence. Independent of the configured refresh interval; the
/// engine decides which ticks start a round.
const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Pingmon - Rolling-Average Ping Monitor
#[derive(Parser, Debug)]
#[command(name = "pingmon", version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        default_value = "configs/config.yaml",
        env = "PINGMON_CONFIG"
    )]
    config: String,

    /// Comma-separated probe targets (overrides config file)
    #[arg(long, env = "PINGMON_SERVERS")]
    servers: Option<String>,

    /// Refresh interval in seconds (overrides config file)
    #[arg(long, env = "PINGMON_REFRESH_INTERVAL")]
    refresh_interval: Option<f64>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,pingmon=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    tracing::info!("Loading configuration from: {}", cli.config);
    let mut config = AppConfig::load_or_init(&cli.config);

    // Apply CLI/env overrides (CLI > ENV > config file)
    if let Some(servers) = cli.servers {
        config.servers = servers;
    }
    if let Some(refresh) = cli.refresh_interval {
        config.refresh_interval = refresh;
    }

    let engine = Arc::new(PingEngine::from_config(&config));
    tracing::info!(
        hosts = engine.hosts().len(),
        refresh_secs = engine.refresh_interval().as_secs_f64(),
        "Starting latency monitor"
    );

    // Display adapter: surface every published reading.
    let mut readings = engine.subscribe();
    tokio::spawn(async move {
        while readings.changed().await.is_ok() {
            let reading = readings.borrow_and_update().clone();
            tracing::info!(
                average_ms = reading.average_ms,
                last_update = %reading
                    .last_update_rfc3339()
                    .unwrap_or_else(|| "-".to_string()),
                "Ping updated"
            );
        }
    });

    let mut ticker = tokio::time::interval(TICK_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                engine.on_tick(Utc::now()).await;
            }
            _ = &mut shutdown => {
                tracing::info!("Shutting down");
                engine.cancel_handle().cancel();
                break;
            }
        }
    }

    tracing::info!("Shutdown complete");
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal");
        }
    }
}
