//! Account Ledger Store
//!
//! One row per account holding the running count of settled trades and the
//! cumulative signed profit. Rows are created by the first settlement and
//! only ever incremented afterwards.

use sqlx::{Executor, Row, Sqlite};

use crate::models::AccountStats;

/// Account ledger operations
pub struct AccountLedger;

impl AccountLedger {
    /// Record one settled trade for `account`.
    ///
    /// Single conditional upsert: inserts `{trades: 1, profit: delta}` or
    /// increments the existing row, with no read-modify-write window.
    pub async fn apply_profit<'e, E>(
        executor: E,
        account: &str,
        profit_delta: f64,
    ) -> Result<(), sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO account_stats (account, trades, profit)
            VALUES (?, 1, ?)
            ON CONFLICT (account) DO UPDATE
               SET trades = trades + 1,
                   profit = profit + excluded.profit
            "#,
        )
        .bind(account)
        .bind(profit_delta)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Current totals; zeros for an account that never settled
    pub async fn read<'e, E>(executor: E, account: &str) -> Result<AccountStats, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row = sqlx::query("SELECT trades, profit FROM account_stats WHERE account = ?")
            .bind(account)
            .fetch_optional(executor)
            .await?;

        match row {
            Some(r) => Ok(AccountStats {
                account: account.to_string(),
                trades: r.try_get("trades")?,
                profit: r.try_get("profit")?,
            }),
            None => Ok(AccountStats::empty(account)),
        }
    }
}
