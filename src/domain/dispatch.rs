//! Signal dispatcher: routes an inbound buy/sell signal through the preset
//! store and the brokerage gateway to the decision engine, then executes the
//! result.
//!
//! The preset is resolved before any brokerage call, so unconfigured symbols
//! never cost a connection. No retry and no at-most-once guard: two
//! concurrent signals for the same symbol may both place orders, and the
//! broker side is expected to idempotency-guard if that matters.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::domain::decision::{
    decide_buy, decide_sell, Decision, DecisionContext, Quote, Side, SkipReason,
};
use crate::domain::error::TraderError;
use crate::domain::preset::normalize_symbol;
use crate::domain::store::PresetStore;
use crate::ports::broker_port::BrokerPort;
use crate::ports::notifier_port::NotifierPort;

/// Inbound signal action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Buy,
    Sell,
}

impl FromStr for Action {
    type Err = TraderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buy" => Ok(Action::Buy),
            "sell" => Ok(Action::Sell),
            other => Err(TraderError::UnknownAction {
                action: other.to_string(),
            }),
        }
    }
}

/// What a dispatched signal did.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderOutcome {
    Placed {
        side: Side,
        quantity: f64,
        limit_price: f64,
    },
    /// A guard stopped the order; the operator was notified.
    Skipped { reason: SkipReason },
    /// Nothing to do; no notification required.
    NoOp { reason: SkipReason },
}

pub struct Dispatcher {
    store: Arc<PresetStore>,
    broker: Arc<dyn BrokerPort>,
    notifier: Arc<dyn NotifierPort>,
    quote_timeout: Duration,
}

impl Dispatcher {
    pub fn new(
        store: Arc<PresetStore>,
        broker: Arc<dyn BrokerPort>,
        notifier: Arc<dyn NotifierPort>,
        quote_timeout: Duration,
    ) -> Self {
        Self {
            store,
            broker,
            notifier,
            quote_timeout,
        }
    }

    /// Route one signal end to end: validate, gather facts, decide, execute.
    pub async fn dispatch(&self, action: &str, ticker: &str) -> Result<OrderOutcome, TraderError> {
        let action: Action = action.parse()?;
        let symbol = normalize_symbol(ticker);
        let preset = self
            .store
            .get(&symbol)
            .ok_or_else(|| TraderError::UnknownSymbol {
                symbol: symbol.clone(),
            })?;

        self.broker.connect().await?;

        let decision = match action {
            Action::Buy => {
                let buying_power = self.broker.buying_power().await?;
                // Skip the market-data request when the funds check already
                // fails; the engine re-checks against the same numbers.
                let quote = if buying_power >= preset.order_size {
                    self.broker.quote(&symbol, self.quote_timeout).await?
                } else {
                    Quote::default()
                };
                decide_buy(&DecisionContext {
                    symbol: symbol.clone(),
                    preset,
                    buying_power,
                    position: None,
                    quote,
                })?
            }
            Action::Sell => {
                let position = self.broker.position_for(&symbol).await?;
                // No market-data request when there is nothing to sell.
                let quote = if position.is_some() {
                    self.broker.quote(&symbol, self.quote_timeout).await?
                } else {
                    Quote::default()
                };
                decide_sell(&DecisionContext {
                    symbol: symbol.clone(),
                    preset,
                    buying_power: 0.0,
                    position,
                    quote,
                })?
            }
        };

        match decision {
            Decision::Place(order) => {
                self.broker.place_order(&order).await?;
                info!(
                    symbol = %order.symbol,
                    side = %order.side,
                    quantity = order.quantity,
                    limit = order.limit_price,
                    "order placed"
                );
                let verb = match order.side {
                    Side::Buy => "Buy",
                    Side::Sell => "Sell",
                };
                self.send(&format!(
                    "{verb} Order Placed: {}, Qty: {}, Limit: {}",
                    order.symbol, order.quantity, order.limit_price
                ))
                .await;
                Ok(OrderOutcome::Placed {
                    side: order.side,
                    quantity: order.quantity,
                    limit_price: order.limit_price,
                })
            }
            Decision::Skip(SkipReason::InsufficientFunds) => {
                info!(%symbol, "buy skipped: insufficient buying power");
                self.send(&format!("Not enough buying power for {symbol}"))
                    .await;
                Ok(OrderOutcome::Skipped {
                    reason: SkipReason::InsufficientFunds,
                })
            }
            Decision::Skip(reason) => {
                info!(%symbol, ?reason, "sell signal took no action");
                Ok(OrderOutcome::NoOp { reason })
            }
        }
    }

    /// Notification is fire-and-forget: a dead notifier never fails a trade.
    async fn send(&self, text: &str) {
        if let Err(err) = self.notifier.notify(text).await {
            warn!(%err, "notification dropped");
        }
    }
}
