//! Trade ingestion server
//!
//! Serves `POST /trades`, `GET /stats/{account}` and `GET /healthz`.

use anyhow::{Context, Result};
use clap::Parser;

use trade_settlement::config::AppConfig;
use trade_settlement::shutdown::shutdown_signal;
use trade_settlement::{Database, gateway, logging};

#[derive(Parser, Debug)]
#[command(name = "server", version, about = "Trade ingestion and account stats HTTP server")]
struct Cli {
    /// Configuration environment, reads config/<env>.yaml
    #[arg(long, short = 'e', default_value = "dev")]
    env: String,

    /// SQLite database path or URL (overrides config)
    #[arg(long)]
    db: Option<String>,

    /// HTTP listen port (overrides config)
    #[arg(long)]
    listen: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.env)
        .with_context(|| format!("Failed to load config for env '{}'", cli.env))?;
    if let Some(db) = cli.db {
        config.database.url = db;
    }
    if let Some(port) = cli.listen {
        config.gateway.port = port;
    }

    let _log_guard = logging::init_logging(&config);
    tracing::info!("Starting trade server in {} mode", cli.env);

    let db = Database::connect(&config.database)
        .await
        .context("Failed to open database")?;
    db.health_check().await.context("Failed to ping database")?;
    db.init_schema().await.context("Failed to create tables")?;

    gateway::run_server(&config.gateway, db.clone(), shutdown_signal())
        .await
        .context("Server failed")?;

    db.close().await;
    tracing::info!("Server stopped");
    Ok(())
}
