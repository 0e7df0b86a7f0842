//! Crossover Screener Binary
//!
//! Runs the SMA crossover screener once, or on a fixed interval, writing the
//! ranked snapshot to disk.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin crossover-screener
//! ```
//!
//! # Environment Variables
//!
//! - `SCREENER_CONFIG`: YAML config file (default: built-in defaults)
//! - `SCREENER_BATCH_SIZE`, `SCREENER_MAX_WORKERS`, `SCREENER_RETRIES`,
//!   `SCREENER_LOOKBACK_DAYS`: runner overrides
//! - `SCREENER_STATE_FILE`: snapshot path (default: `./data/state.json`)
//! - `SCREENER_TICKERS_FILE`: ticker universe file
//! - `SCREENER_RUN_INTERVAL_SECS`: seconds between runs (default: 0, run once)
//! - `RUST_LOG`: Log filter (default: from config, `info`)

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use crossover_screener::application::dto::RunRequest;
use crossover_screener::application::services::{RunTrigger, TriggerError};
use crossover_screener::application::use_cases::RunBacktestUseCase;
use crossover_screener::config::Config;
use crossover_screener::infrastructure::persistence::JsonFileSnapshotStore;
use crossover_screener::infrastructure::price_source::YahooPriceSource;
use crossover_screener::infrastructure::universe::FileTickerUniverse;
use crossover_screener::observability::{MetricsConfig, init_metrics, init_tracing};
use tokio::signal;

/// Concrete trigger wired to production adapters.
type ScreenerTrigger = RunTrigger<YahooPriceSource, JsonFileSnapshotStore, FileTickerUniverse>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    let config = Config::load().context("failed to load configuration")?;
    init_tracing(&config.observability.logging).context("failed to initialize tracing")?;

    tracing::info!("Starting crossover screener");
    log_config(&config);

    if config.observability.metrics.enabled {
        let addr = config.metrics_addr()?;
        init_metrics(&MetricsConfig::with_addr(addr)).context("failed to start metrics exporter")?;
    }

    let trigger = create_trigger(&config)?;

    match config.runner.run_interval() {
        None => {
            tokio::select! {
                result = run_once(&trigger) => result?,
                () = shutdown_signal() => tracing::warn!("Run interrupted"),
            }
        }
        Some(interval) => {
            tokio::select! {
                () = run_every(&trigger, interval) => {}
                () = shutdown_signal() => {}
            }
        }
    }

    tracing::info!("Crossover screener stopped");
    Ok(())
}

/// Wire adapters and the scheduler.
fn create_trigger(config: &Config) -> anyhow::Result<ScreenerTrigger> {
    let price_source =
        YahooPriceSource::new(&config.price_source).context("failed to build price source")?;
    let store = JsonFileSnapshotStore::new(config.store.snapshot_path.clone());
    let universe = config
        .universe
        .path
        .clone()
        .map_or_else(FileTickerUniverse::unconfigured, FileTickerUniverse::new);

    let use_case = RunBacktestUseCase::new(
        Arc::new(price_source),
        Arc::new(store),
        Arc::new(universe),
        config.run_settings(),
    );

    Ok(RunTrigger::new(Arc::new(use_case)))
}

/// Run once and wait for the result.
async fn run_once(trigger: &ScreenerTrigger) -> anyhow::Result<()> {
    let summary = trigger.trigger(RunRequest::universe())?.wait().await?;

    for (rank, result) in summary.snapshot.top(10).iter().enumerate() {
        tracing::info!(
            rank = rank + 1,
            ticker = %result.ticker,
            return_pct = result.return_pct,
            "Ranking"
        );
    }
    Ok(())
}

/// Trigger a run every `interval`; overlapping ticks are skipped.
async fn run_every(trigger: &ScreenerTrigger, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;

        match trigger.trigger(RunRequest::universe()) {
            Ok(handle) => {
                tokio::spawn(async move {
                    match handle.wait().await {
                        Ok(summary) => tracing::info!(
                            run_id = %summary.run_id(),
                            completed = summary.completed_count(),
                            failed = summary.failed_count(),
                            "Scheduled run finished"
                        ),
                        Err(e) => tracing::error!(error = %e, "Scheduled run failed"),
                    }
                });
            }
            Err(TriggerError::AlreadyRunning) => {
                tracing::warn!("Previous run still in progress, skipping tick");
            }
            Err(e) => tracing::error!(error = %e, "Failed to trigger run"),
        }
    }
}

fn log_config(config: &Config) {
    tracing::info!(
        batch_size = config.runner.batch_size,
        max_workers = config.runner.max_workers,
        retries = config.runner.retries,
        lookback_days = config.runner.lookback_days,
        snapshot_path = %config.store.snapshot_path.display(),
        universe = ?config.universe.path,
        run_interval_secs = config.runner.run_interval_secs,
        "Configuration loaded"
    );
}

/// Load .env file from current or ancestor directories.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

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
            tracing::info!("Received Ctrl+C, shutting down");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, shutting down");
        }
    }
}
