//! Queue and ledger table definitions
//!
//! Every statement is idempotent; [`init_schema`] runs them on each startup.

use sqlx::SqlitePool;

pub const TRADES_TABLE: &str = "trades_q";
pub const LEDGER_TABLE: &str = "account_stats";

pub const CREATE_TRADES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS trades_q (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    account   TEXT    NOT NULL CHECK (length(account) > 0),
    symbol    TEXT    NOT NULL,
    volume    REAL    NOT NULL CHECK (volume > 0),
    open      REAL    NOT NULL CHECK (open > 0),
    close     REAL    NOT NULL CHECK (close > 0),
    side      TEXT    NOT NULL CHECK (side IN ('buy', 'sell')),
    processed INTEGER NOT NULL DEFAULT 0 CHECK (processed IN (0, 1))
)
"#;

pub const CREATE_PENDING_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_trades_q_pending ON trades_q (processed, id)
"#;

/// A settled trade stays settled
pub const CREATE_PROCESSED_GUARD: &str = r#"
CREATE TRIGGER IF NOT EXISTS trades_q_processed_final
BEFORE UPDATE OF processed ON trades_q
WHEN OLD.processed = 1 AND NEW.processed = 0
BEGIN
    SELECT RAISE(ABORT, 'settled trade cannot return to pending');
END
"#;

/// Queue rows are the audit trail
pub const CREATE_DELETE_GUARD: &str = r#"
CREATE TRIGGER IF NOT EXISTS trades_q_no_delete
BEFORE DELETE ON trades_q
BEGIN
    SELECT RAISE(ABORT, 'queued trades are never deleted');
END
"#;

pub const CREATE_LEDGER_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS account_stats (
    account TEXT    PRIMARY KEY,
    trades  INTEGER NOT NULL DEFAULT 0 CHECK (trades >= 0),
    profit  REAL    NOT NULL DEFAULT 0
)
"#;

const STATEMENTS: [(&str, &str); 5] = [
    ("trades table", CREATE_TRADES_TABLE),
    ("pending index", CREATE_PENDING_INDEX),
    ("processed guard", CREATE_PROCESSED_GUARD),
    ("delete guard", CREATE_DELETE_GUARD),
    ("ledger table", CREATE_LEDGER_TABLE),
];

/// Create both tables (and their guards) if absent
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for (name, sql) in STATEMENTS {
        sqlx::query(sql).execute(pool).await.inspect_err(|e| {
            tracing::error!("Failed to create {}: {}", name, e);
        })?;
    }
    tracing::info!("Schema ready ({}, {})", TRADES_TABLE, LEDGER_TABLE);
    Ok(())
}
