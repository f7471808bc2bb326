//! Order decision engine.
//!
//! Pure decision logic for buy and sell signals. The dispatcher gathers live
//! account facts into a [`DecisionContext`] and executes whatever comes back;
//! nothing here performs I/O.

use crate::domain::error::TraderError;
use crate::domain::preset::Preset;

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// How long an order stays working.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeInForce {
    GoodTillCancelled,
}

/// An open position as reported by the brokerage.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub quantity: f64,
    pub avg_cost: f64,
}

/// A price quote. Either side may be missing outside market hours.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Quote {
    pub last: Option<f64>,
    pub close: Option<f64>,
}

impl Quote {
    /// Best usable price: last if it is a real price, otherwise close.
    /// Zero and non-finite values count as missing.
    pub fn best(&self) -> Option<f64> {
        usable(self.last).or_else(|| usable(self.close))
    }
}

fn usable(price: Option<f64>) -> Option<f64> {
    price.filter(|p| p.is_finite() && *p > 0.0)
}

/// Live facts for one buy/sell decision. Built per signal, never persisted.
///
/// The preset is already resolved: a signal for an unconfigured symbol is
/// rejected by the dispatcher before a context is ever built.
#[derive(Debug, Clone)]
pub struct DecisionContext {
    pub symbol: String,
    pub preset: Preset,
    pub buying_power: f64,
    pub position: Option<Position>,
    pub quote: Quote,
}

/// A concrete order for the gateway to place.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderInstruction {
    pub symbol: String,
    pub side: Side,
    pub quantity: f64,
    pub limit_price: f64,
    pub time_in_force: TimeInForce,
    /// Allow fills outside regular trading hours.
    pub outside_rth: bool,
}

/// Why a decision placed no order. These are outcomes, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    InsufficientFunds,
    NoPosition,
    BelowThreshold,
}

/// Outcome of a decision: place an order, or deliberately do nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Place(OrderInstruction),
    Skip(SkipReason),
}

fn limit_order(symbol: &str, side: Side, quantity: f64, price: f64) -> OrderInstruction {
    OrderInstruction {
        symbol: symbol.to_string(),
        side,
        quantity,
        limit_price: price,
        time_in_force: TimeInForce::GoodTillCancelled,
        outside_rth: true,
    }
}

/// Decide a buy signal.
///
/// Skips when buying power cannot cover the configured order size. Quantity
/// is `order_size / price` rounded half-to-even to whole shares; the order is
/// a GTC limit at the observed price, allowed to fill outside regular hours.
pub fn decide_buy(ctx: &DecisionContext) -> Result<Decision, TraderError> {
    if ctx.buying_power < ctx.preset.order_size {
        return Ok(Decision::Skip(SkipReason::InsufficientFunds));
    }
    let price = ctx
        .quote
        .best()
        .ok_or_else(|| TraderError::PriceUnavailable {
            symbol: ctx.symbol.clone(),
        })?;
    let quantity = (ctx.preset.order_size / price).round_ties_even();
    Ok(Decision::Place(limit_order(
        &ctx.symbol,
        Side::Buy,
        quantity,
        price,
    )))
}

/// Decide a sell signal.
///
/// No open position is a no-op, not an error. The full held quantity is sold
/// when the unrealized gain `(price - avg_cost) / avg_cost * 100` meets the
/// preset threshold. A position with zero average cost is rejected rather
/// than divided by.
pub fn decide_sell(ctx: &DecisionContext) -> Result<Decision, TraderError> {
    let Some(position) = &ctx.position else {
        return Ok(Decision::Skip(SkipReason::NoPosition));
    };
    let price = ctx
        .quote
        .best()
        .ok_or_else(|| TraderError::PriceUnavailable {
            symbol: ctx.symbol.clone(),
        })?;
    if position.avg_cost == 0.0 {
        return Err(TraderError::InvalidPosition {
            symbol: ctx.symbol.clone(),
        });
    }
    let gain_pct = (price - position.avg_cost) / position.avg_cost * 100.0;
    if gain_pct >= ctx.preset.min_profit_pct {
        Ok(Decision::Place(limit_order(
            &ctx.symbol,
            Side::Sell,
            position.quantity,
            price,
        )))
    } else {
        Ok(Decision::Skip(SkipReason::BelowThreshold))
    }
}
