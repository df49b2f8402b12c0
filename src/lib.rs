//! Trade Settlement - durable trade queue with exactly-once settlement
//!
//! Clients submit trades over HTTP; each one is appended to a durable queue
//! and later settled, exactly once, into a per-account running total of
//! trade count and realized profit.
//!
//! ```text
//! POST /trades ──▶ trades_q ──▶ SettlementEngine ──▶ account_stats ──▶ GET /stats/{account}
//!                 (pending)     claim + profit +       (trades, profit)
//!                               upsert, one tx
//! ```
//!
//! # Modules
//!
//! - [`config`] - YAML configuration
//! - [`logging`] - tracing subscriber setup
//! - [`db`] - SQLite pool and schema bootstrap
//! - [`models`] - Trade and ledger types
//! - [`validation`] - Submission rules
//! - [`queue`] - Trade Queue Store
//! - [`ledger`] - Account Ledger Store
//! - [`settlement`] - Settlement Engine and polling worker
//! - [`gateway`] - HTTP boundary

pub mod config;
pub mod db;
pub mod gateway;
pub mod ledger;
pub mod logging;
pub mod models;
pub mod queue;
pub mod settlement;
pub mod shutdown;
pub mod validation;

// Convenient re-exports at crate root
pub use db::Database;
pub use ledger::AccountLedger;
pub use models::{AccountStats, NewTrade, QueuedTrade, Side, TradeId};
pub use queue::TradeQueue;
pub use settlement::{
    LOT_SIZE, Settlement, SettlementEngine, SettlementError, SettlementOutcome, SettlementWorker,
    WorkerStats,
};
pub use validation::{TradeSubmission, ValidationError};
