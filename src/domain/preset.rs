//! Per-symbol trading configuration.

use serde::{Deserialize, Serialize};

/// Stored trading configuration for one ticker symbol.
///
/// A preset either exists with both fields populated or does not exist at
/// all; partial entries are unrepresentable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    /// How much to spend per buy signal, in currency units.
    pub order_size: f64,
    /// Minimum unrealized gain, in percent, before a sell signal is acted on.
    pub min_profit_pct: f64,
}

/// Canonical key form for a ticker: trimmed and uppercased.
pub fn normalize_symbol(raw: &str) -> String {
    raw.trim().to_uppercase()
}
