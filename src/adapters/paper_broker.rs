//! In-process paper brokerage adapter.
//!
//! Simulates the account facts the dispatcher needs so the bot runs
//! end-to-end without a live gateway. Accepted buys fill into a tracked
//! position at the limit price, so a later sell signal has something to act
//! on; a live gateway adapter would implement the same port against a real
//! connection.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use crate::domain::decision::{OrderInstruction, Position, Quote, Side};
use crate::domain::error::TraderError;
use crate::ports::broker_port::BrokerPort;

struct PaperAccount {
    buying_power: f64,
    positions: HashMap<String, Position>,
    quotes: HashMap<String, Quote>,
}

pub struct PaperBrokerAdapter {
    account: Mutex<PaperAccount>,
}

impl PaperBrokerAdapter {
    pub fn new(buying_power: f64) -> Self {
        Self {
            account: Mutex::new(PaperAccount {
                buying_power,
                positions: HashMap::new(),
                quotes: HashMap::new(),
            }),
        }
    }

    /// Seed or update the simulated quote for a symbol.
    pub fn set_quote(&self, symbol: &str, quote: Quote) {
        self.account
            .lock()
            .unwrap()
            .quotes
            .insert(symbol.to_string(), quote);
    }

    /// Seed or replace the simulated position for a symbol.
    pub fn set_position(&self, symbol: &str, position: Position) {
        self.account
            .lock()
            .unwrap()
            .positions
            .insert(symbol.to_string(), position);
    }
}

#[async_trait]
impl BrokerPort for PaperBrokerAdapter {
    async fn connect(&self) -> Result<(), TraderError> {
        Ok(())
    }

    async fn buying_power(&self) -> Result<f64, TraderError> {
        Ok(self.account.lock().unwrap().buying_power)
    }

    async fn position_for(&self, symbol: &str) -> Result<Option<Position>, TraderError> {
        Ok(self.account.lock().unwrap().positions.get(symbol).cloned())
    }

    async fn quote(&self, symbol: &str, _timeout: Duration) -> Result<Quote, TraderError> {
        // An unseeded symbol quotes as empty, which the engine reports as
        // price unavailable.
        Ok(self
            .account
            .lock()
            .unwrap()
            .quotes
            .get(symbol)
            .copied()
            .unwrap_or_default())
    }

    async fn place_order(&self, order: &OrderInstruction) -> Result<(), TraderError> {
        let mut account = self.account.lock().unwrap();
        let value = order.quantity * order.limit_price;
        match order.side {
            Side::Buy => {
                account.buying_power -= value;
                let filled = match account.positions.get(&order.symbol) {
                    Some(held) => {
                        let total_qty = held.quantity + order.quantity;
                        let blended = if total_qty > 0.0 {
                            (held.quantity * held.avg_cost + value) / total_qty
                        } else {
                            0.0
                        };
                        Position {
                            quantity: total_qty,
                            avg_cost: blended,
                        }
                    }
                    None => Position {
                        quantity: order.quantity,
                        avg_cost: order.limit_price,
                    },
                };
                account.positions.insert(order.symbol.clone(), filled);
            }
            Side::Sell => {
                account.buying_power += value;
                account.positions.remove(&order.symbol);
            }
        }
        info!(
            symbol = %order.symbol,
            side = %order.side,
            quantity = order.quantity,
            limit = order.limit_price,
            "paper fill"
        );
        Ok(())
    }
}
