use sqlx::error::ErrorKind;
use thiserror::Error;

use crate::models::TradeId;

/// Failure of a settlement attempt. The attempt's transaction has always
/// been rolled back by the time the caller sees this.
#[derive(Debug, Error)]
pub enum SettlementError {
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// The trade's profit, or the account total after adding it, is not a
    /// finite number and cannot be booked.
    #[error("Profit overflow settling trade {trade_id} for account {account}")]
    ProfitOverflow { trade_id: TradeId, account: String },
}

impl SettlementError {
    /// Retrying cannot succeed: the deployment is misconfigured, a row is
    /// undecodable, or the oldest trade can never be booked. The worker
    /// stops rather than retry the same trade forever.
    pub fn is_fatal(&self) -> bool {
        match self {
            SettlementError::Storage(e) => is_structural(e),
            SettlementError::ProfitOverflow { .. } => true,
        }
    }

    /// Transient failure: the trade stays pending and the next tick retries
    pub fn is_retryable(&self) -> bool {
        !self.is_fatal()
    }
}

fn is_structural(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Configuration(_)
        | sqlx::Error::PoolClosed
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. } => true,
        sqlx::Error::Database(db) => match db.kind() {
            // Deterministic for a given row; trigger aborts stay transient
            ErrorKind::NotNullViolation
            | ErrorKind::CheckViolation
            | ErrorKind::UniqueViolation
            | ErrorKind::ForeignKeyViolation => true,
            _ => {
                let msg = db.message();
                msg.contains("no such table")
                    || msg.contains("no such column")
                    || msg.contains("has no column")
            }
        },
        _ => false,
    }
}
