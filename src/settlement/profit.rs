use crate::models::{QueuedTrade, Side};

/// Standard lot: price difference units to account currency
pub const LOT_SIZE: f64 = 100_000.0;

/// Signed realized profit of one trade.
///
/// `(close - open) * volume * LOT_SIZE`, negated for sells.
pub fn compute_profit(side: Side, open: f64, close: f64, volume: f64) -> f64 {
    let profit = (close - open) * volume * LOT_SIZE;
    match side {
        Side::Buy => profit,
        Side::Sell => -profit,
    }
}

pub fn trade_profit(trade: &QueuedTrade) -> f64 {
    compute_profit(trade.side, trade.open, trade.close, trade.volume)
}
