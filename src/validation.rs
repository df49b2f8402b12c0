//! Ingestion validation for trade submissions
//!
//! A submission is accepted only when:
//! - `account` is non-empty
//! - `symbol` is exactly six uppercase ASCII letters (`^[A-Z]{6}$`)
//! - `volume`, `open` and `close` are finite and strictly positive
//! - `side` is `"buy"` or `"sell"`
//! - the resulting profit is representable (finite)
//!
//! Invalid submissions never reach the trade queue.

use serde::Deserialize;
use std::borrow::Cow;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{NewTrade, Side, UnknownSide};
use crate::settlement::compute_profit;

const SYMBOL_LEN: usize = 6;

/// Rejected submission
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid trade submission: {0}")]
    Invalid(#[from] validator::ValidationErrors),

    #[error(transparent)]
    Side(#[from] UnknownSide),
}

impl ValidationError {
    /// Names of the offending fields, sorted
    pub fn fields(&self) -> Vec<String> {
        match self {
            ValidationError::Invalid(errors) => {
                let mut fields: Vec<String> = errors
                    .field_errors()
                    .keys()
                    .map(|k| k.to_string())
                    .collect();
                fields.sort();
                fields
            }
            ValidationError::Side(_) => vec!["side".to_string()],
        }
    }
}

/// Raw `POST /trades` body.
///
/// Every field defaults when absent so that `{}` is reported as a set of
/// field violations rather than a JSON shape error.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct TradeSubmission {
    #[validate(length(min = 1, message = "must not be empty"))]
    #[schema(example = "123")]
    pub account: String,

    #[validate(custom(function = "validate_symbol"))]
    #[schema(example = "EURUSD")]
    pub symbol: String,

    #[validate(custom(function = "validate_positive"))]
    #[schema(example = 1.0)]
    pub volume: f64,

    #[validate(custom(function = "validate_positive"))]
    #[schema(example = 1.1)]
    pub open: f64,

    #[validate(custom(function = "validate_positive"))]
    #[schema(example = 1.105)]
    pub close: f64,

    #[validate(custom(function = "validate_side"))]
    #[schema(example = "buy")]
    pub side: String,
}

impl TradeSubmission {
    /// Check every rule and produce the typed trade
    pub fn validate_into(self) -> Result<NewTrade, ValidationError> {
        self.validate()?;
        let side: Side = self.side.parse()?;

        if !compute_profit(side, self.open, self.close, self.volume).is_finite() {
            let mut errors = validator::ValidationErrors::new();
            errors.add(
                "volume",
                validator::ValidationError::new("profit_overflow")
                    .with_message(Cow::Borrowed("trade size overflows profit")),
            );
            return Err(errors.into());
        }

        Ok(NewTrade {
            account: self.account,
            symbol: self.symbol,
            volume: self.volume,
            open: self.open,
            close: self.close,
            side,
        })
    }
}

fn validate_symbol(symbol: &str) -> Result<(), validator::ValidationError> {
    if symbol.len() == SYMBOL_LEN && symbol.bytes().all(|b| b.is_ascii_uppercase()) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("symbol")
            .with_message(Cow::Borrowed("must be exactly 6 uppercase letters")))
    }
}

fn validate_positive(value: f64) -> Result<(), validator::ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(validator::ValidationError::new("positive")
            .with_message(Cow::Borrowed("must be a finite number greater than zero")))
    }
}

fn validate_side(side: &str) -> Result<(), validator::ValidationError> {
    match side.parse::<Side>() {
        Ok(_) => Ok(()),
        Err(_) => Err(validator::ValidationError::new("side")
            .with_message(Cow::Borrowed("must be 'buy' or 'sell'"))),
    }
}
