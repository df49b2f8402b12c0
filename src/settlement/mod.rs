//! Settlement pipeline: profit arithmetic, the transactional engine and its
//! polling driver.

pub mod engine;
pub mod error;
pub mod profit;
pub mod worker;

pub use engine::{Settlement, SettlementEngine, SettlementOutcome};
pub use error::SettlementError;
pub use profit::{LOT_SIZE, compute_profit, trade_profit};
pub use worker::{SettlementWorker, WorkerStats};
