//! Settlement worker
//!
//! Polls the trade queue and settles each trade into the account ledger.
//! Transient storage errors are retried on the next tick; structural ones
//! stop the process with a non-zero exit code.

use anyhow::{Context, Result};
use clap::Parser;
use std::time::Duration;
use tokio::sync::watch;

use trade_settlement::config::{AppConfig, parse_duration};
use trade_settlement::shutdown::shutdown_signal;
use trade_settlement::{Database, SettlementEngine, SettlementWorker, TradeQueue, logging};

#[derive(Parser, Debug)]
#[command(name = "worker", version, about = "Settle queued trades into account stats")]
struct Cli {
    /// Configuration environment, reads config/<env>.yaml
    #[arg(long, short = 'e', default_value = "dev")]
    env: String,

    /// SQLite database path or URL (overrides config)
    #[arg(long)]
    db: Option<String>,

    /// Polling interval, e.g. 100ms or 1s (overrides config)
    #[arg(long, value_parser = parse_duration)]
    poll: Option<Duration>,

    /// Settle everything pending, then exit
    #[arg(long)]
    drain: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.env)
        .with_context(|| format!("Failed to load config for env '{}'", cli.env))?;
    if let Some(db) = cli.db {
        config.database.url = db;
    }
    if let Some(poll) = cli.poll {
        config.worker.poll_interval_ms = poll.as_millis() as u64;
    }

    let _log_guard = logging::init_logging(&config);
    tracing::info!("Starting settlement worker in {} mode", cli.env);

    let db = Database::connect(&config.database)
        .await
        .context("Failed to open database")?;
    db.health_check().await.context("Failed to ping database")?;
    db.init_schema().await.context("Failed to create tables")?;

    let pending = TradeQueue::pending_count(db.pool())
        .await
        .context("Failed to count pending trades")?;
    tracing::info!("{} trades pending settlement", pending);

    let engine = SettlementEngine::new(db.clone());

    if cli.drain {
        let settled = engine.drain().await.context("Settlement failed")?;
        tracing::info!("Drained {} trades", settled.len());
        db.close().await;
        return Ok(());
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    let worker = SettlementWorker::new(engine, config.worker.poll_interval());
    let result = worker.run(shutdown_rx).await;
    db.close().await;

    let stats = result.context("Settlement worker halted on structural storage failure")?;
    tracing::info!("Worker stopped after settling {} trades", stats.settled);
    Ok(())
}
