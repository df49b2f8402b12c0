//! Trade and ledger data types
//!
//! - [`NewTrade`]: a validated submission, ready to enqueue
//! - [`QueuedTrade`]: a row of the trade queue
//! - [`AccountStats`]: cumulative settlement state for one account

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Queue row id. Assigned by the store, strictly increasing, defines FIFO order.
pub type TradeId = i64;

/// Trade direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown side '{0}' (expected 'buy' or 'sell')")]
pub struct UnknownSide(pub String);

impl FromStr for Side {
    type Err = UnknownSide;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buy" => Ok(Side::Buy),
            "sell" => Ok(Side::Sell),
            other => Err(UnknownSide(other.to_string())),
        }
    }
}

/// Validated trade intent. Only produced by
/// [`TradeSubmission::validate_into`](crate::validation::TradeSubmission::validate_into).
#[derive(Debug, Clone, PartialEq)]
pub struct NewTrade {
    pub account: String,
    pub symbol: String,
    pub volume: f64,
    pub open: f64,
    pub close: f64,
    pub side: Side,
}

/// A pending or settled trade in the queue table
#[derive(Debug, Clone, PartialEq)]
pub struct QueuedTrade {
    pub id: TradeId,
    pub account: String,
    pub symbol: String,
    pub volume: f64,
    pub open: f64,
    pub close: f64,
    pub side: Side,
    pub processed: bool,
}

/// Per-account settlement totals, as served by `GET /stats/{account}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AccountStats {
    #[schema(example = "acc42")]
    pub account: String,
    /// Number of settled trades
    #[schema(example = 3)]
    pub trades: i64,
    /// Cumulative signed profit
    #[schema(example = 1000000.0)]
    pub profit: f64,
}

impl AccountStats {
    /// Stats for an account with no settlements yet
    pub fn empty(account: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            trades: 0,
            profit: 0.0,
        }
    }
}
