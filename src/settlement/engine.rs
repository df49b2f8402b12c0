//! Settlement Engine
//!
//! One attempt = one transaction:
//!
//! ```text
//! BEGIN
//!   claim oldest pending trade (marks processed)   -- none: ROLLBACK, idle
//!   profit = (close - open) * volume * LOT_SIZE    -- negated for sell
//!   non-finite profit or total                     -- ROLLBACK, fatal
//!   upsert account_stats += (1, profit)
//! COMMIT                                           -- any failure: ROLLBACK
//! ```
//!
//! A trade is either pending or settled outside the transaction; there is
//! no observable claimed-but-unsettled state.

use sqlx::SqliteConnection;
use tracing::{debug, warn};

use super::error::SettlementError;
use super::profit::trade_profit;
use crate::db::Database;
use crate::ledger::AccountLedger;
use crate::models::TradeId;
use crate::queue::TradeQueue;

/// A committed settlement
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    pub trade_id: TradeId,
    pub account: String,
    pub profit: f64,
}

/// Result of one settlement attempt
#[derive(Debug, Clone, PartialEq)]
pub enum SettlementOutcome {
    Settled(Settlement),
    /// Queue empty. Normal idle signal, not an error.
    NoWorkAvailable,
}

/// Converts queued trades into ledger updates, exactly once each
#[derive(Clone)]
pub struct SettlementEngine {
    db: Database,
}

impl SettlementEngine {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Settle the oldest pending trade, if any
    pub async fn settle_once(&self) -> Result<SettlementOutcome, SettlementError> {
        let mut tx = self.db.pool().begin().await?;

        match settle_in(&mut tx).await {
            Ok(Some(settlement)) => {
                tx.commit().await?;
                debug!(
                    trade_id = settlement.trade_id,
                    account = %settlement.account,
                    profit = settlement.profit,
                    "Trade settled"
                );
                Ok(SettlementOutcome::Settled(settlement))
            }
            Ok(None) => {
                tx.rollback().await?;
                Ok(SettlementOutcome::NoWorkAvailable)
            }
            Err(e) => {
                if let Err(rb) = tx.rollback().await {
                    warn!(error = %rb, "Rollback after failed settlement also failed");
                }
                Err(e)
            }
        }
    }

    /// Settle until the queue is empty, returning what was settled in order
    pub async fn drain(&self) -> Result<Vec<Settlement>, SettlementError> {
        let mut settled = Vec::new();
        while let SettlementOutcome::Settled(s) = self.settle_once().await? {
            settled.push(s);
        }
        Ok(settled)
    }
}

/// Claim, price and book one trade on an open transaction; the caller
/// commits or rolls back
async fn settle_in(conn: &mut SqliteConnection) -> Result<Option<Settlement>, SettlementError> {
    let Some(trade) = TradeQueue::claim_oldest_unprocessed(&mut *conn).await? else {
        return Ok(None);
    };

    let profit = trade_profit(&trade);
    let current = AccountLedger::read(&mut *conn, &trade.account).await?;
    if !profit.is_finite() || !(current.profit + profit).is_finite() {
        return Err(SettlementError::ProfitOverflow {
            trade_id: trade.id,
            account: trade.account,
        });
    }
    AccountLedger::apply_profit(&mut *conn, &trade.account, profit).await?;

    Ok(Some(Settlement {
        trade_id: trade.id,
        account: trade.account,
        profit,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewTrade, Side};

    async fn setup() -> (Database, SettlementEngine) {
        let db = Database::in_memory().await.unwrap();
        db.init_schema().await.unwrap();
        let engine = SettlementEngine::new(db.clone());
        (db, engine)
    }

    fn trade(account: &str, volume: f64, open: f64, close: f64, side: Side) -> NewTrade {
        NewTrade {
            account: account.to_string(),
            symbol: "ABCDEF".to_string(),
            volume,
            open,
            close,
            side,
        }
    }

    #[tokio::test]
    async fn test_empty_queue_is_idle() {
        let (_db, engine) = setup().await;
        assert_eq!(
            engine.settle_once().await.unwrap(),
            SettlementOutcome::NoWorkAvailable
        );
    }

    #[tokio::test]
    async fn test_buy_side() {
        let (db, engine) = setup().await;
        let id = TradeQueue::enqueue(db.pool(), &trade("b", 2.0, 10.0, 15.0, Side::Buy))
            .await
            .unwrap();

        let outcome = engine.settle_once().await.unwrap();
        assert_eq!(
            outcome,
            SettlementOutcome::Settled(Settlement {
                trade_id: id,
                account: "b".to_string(),
                profit: 1_000_000.0,
            })
        );

        let stats = AccountLedger::read(db.pool(), "b").await.unwrap();
        assert_eq!(stats.trades, 1);
        assert_eq!(stats.profit, 1_000_000.0);
    }

    #[tokio::test]
    async fn test_sell_side() {
        let (db, engine) = setup().await;
        TradeQueue::enqueue(db.pool(), &trade("s", 1.0, 20.0, 15.0, Side::Sell))
            .await
            .unwrap();

        engine.settle_once().await.unwrap();

        let stats = AccountLedger::read(db.pool(), "s").await.unwrap();
        assert_eq!(stats.trades, 1);
        assert_eq!(stats.profit, 500_000.0);
    }

    #[tokio::test]
    async fn test_multiple_trades_same_account() {
        let (db, engine) = setup().await;
        for t in [
            trade("m", 1.0, 1.0, 2.0, Side::Buy),
            trade("m", 0.5, 2.0, 1.5, Side::Sell),
        ] {
            TradeQueue::enqueue(db.pool(), &t).await.unwrap();
        }

        let settled = engine.drain().await.unwrap();
        assert_eq!(settled.len(), 2);
        assert_eq!(
            engine.settle_once().await.unwrap(),
            SettlementOutcome::NoWorkAvailable
        );

        let stats = AccountLedger::read(db.pool(), "m").await.unwrap();
        assert_eq!(stats.trades, 2);
        assert_eq!(stats.profit, 100_000.0 + 25_000.0);
    }

    #[tokio::test]
    async fn test_missing_ledger_table_is_fatal_and_rolls_back() {
        let (db, engine) = setup().await;
        let id = TradeQueue::enqueue(db.pool(), &trade("x", 1.0, 1.0, 2.0, Side::Buy))
            .await
            .unwrap();
        sqlx::query("DROP TABLE account_stats")
            .execute(db.pool())
            .await
            .unwrap();

        let err = engine.settle_once().await.unwrap_err();
        assert!(err.is_fatal(), "missing table is structural: {err}");

        let stored = TradeQueue::get(db.pool(), id).await.unwrap().unwrap();
        assert!(!stored.processed, "claim must roll back with the failed attempt");
    }

    #[tokio::test]
    async fn test_unbookable_profit_is_fatal_and_rolls_back() {
        let (db, engine) = setup().await;
        // Bypasses ingestion validation
        let id = TradeQueue::enqueue(db.pool(), &trade("o", 1e10, 1.0, 1e300, Side::Buy))
            .await
            .unwrap();

        let err = engine.settle_once().await.unwrap_err();
        assert!(matches!(
            err,
            SettlementError::ProfitOverflow { trade_id, .. } if trade_id == id
        ));
        assert!(err.is_fatal());

        let stored = TradeQueue::get(db.pool(), id).await.unwrap().unwrap();
        assert!(!stored.processed);
        assert_eq!(AccountLedger::read(db.pool(), "o").await.unwrap().trades, 0);
    }

    #[tokio::test]
    async fn test_total_overflow_is_refused() {
        let (db, engine) = setup().await;
        AccountLedger::apply_profit(db.pool(), "t", f64::MAX).await.unwrap();
        // Finite on its own, overflows the running total
        TradeQueue::enqueue(db.pool(), &trade("t", 1e200, 1.0, 2e98, Side::Buy))
            .await
            .unwrap();

        let err = engine.settle_once().await.unwrap_err();
        assert!(matches!(err, SettlementError::ProfitOverflow { .. }));

        let stats = AccountLedger::read(db.pool(), "t").await.unwrap();
        assert_eq!((stats.trades, stats.profit), (1, f64::MAX));
        assert_eq!(TradeQueue::pending_count(db.pool()).await.unwrap(), 1);
    }
}
