//! Trade Queue Store
//!
//! Append-only table of trade intents. Rows are inserted unprocessed and
//! flipped to processed exactly once, by [`TradeQueue::claim_oldest_unprocessed`]
//! inside a settlement transaction.

use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Row, Sqlite, SqliteConnection};

use crate::models::{NewTrade, QueuedTrade, Side, TradeId};

/// Claim and mark in one statement so two settlement attempts can never
/// select the same row.
const CLAIM_OLDEST_SQL: &str = r#"
UPDATE trades_q
   SET processed = 1
 WHERE id = (
        SELECT id
          FROM trades_q
         WHERE processed = 0
         ORDER BY id
         LIMIT 1
       )
RETURNING id, account, symbol, volume, open, close, side, processed
"#;

/// Trade queue operations
pub struct TradeQueue;

impl TradeQueue {
    /// Insert a validated trade as pending, returning its queue id
    pub async fn enqueue<'e, E>(executor: E, trade: &NewTrade) -> Result<TradeId, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO trades_q (account, symbol, volume, open, close, side)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&trade.account)
        .bind(&trade.symbol)
        .bind(trade.volume)
        .bind(trade.open)
        .bind(trade.close)
        .bind(trade.side.as_str())
        .fetch_one(executor)
        .await?;

        Ok(id)
    }

    /// Atomically take the pending trade with the smallest id and mark it
    /// processed. `None` means the queue is empty.
    ///
    /// Call only on a connection with an open transaction, as the first
    /// statement of that transaction: the mark becomes durable only when the
    /// caller commits, and a rollback returns the trade to pending.
    pub async fn claim_oldest_unprocessed(
        conn: &mut SqliteConnection,
    ) -> Result<Option<QueuedTrade>, sqlx::Error> {
        let row = sqlx::query(CLAIM_OLDEST_SQL)
            .fetch_optional(&mut *conn)
            .await?;

        row.as_ref().map(row_to_trade).transpose()
    }

    /// Fetch one queued trade by id
    pub async fn get<'e, E>(executor: E, id: TradeId) -> Result<Option<QueuedTrade>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row = sqlx::query(
            r#"SELECT id, account, symbol, volume, open, close, side, processed
               FROM trades_q WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        row.as_ref().map(row_to_trade).transpose()
    }

    /// Number of trades waiting for settlement
    pub async fn pending_count<'e, E>(executor: E) -> Result<i64, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_scalar("SELECT count(*) FROM trades_q WHERE processed = 0")
            .fetch_one(executor)
            .await
    }
}

fn row_to_trade(row: &SqliteRow) -> Result<QueuedTrade, sqlx::Error> {
    let side: String = row.try_get("side")?;
    let side: Side = side.parse().map_err(|e| sqlx::Error::ColumnDecode {
        index: "side".to_string(),
        source: Box::new(e),
    })?;

    Ok(QueuedTrade {
        id: row.try_get("id")?,
        account: row.try_get("account")?,
        symbol: row.try_get("symbol")?,
        volume: row.try_get("volume")?,
        open: row.try_get("open")?,
        close: row.try_get("close")?,
        side,
        processed: row.try_get("processed")?,
    })
}
