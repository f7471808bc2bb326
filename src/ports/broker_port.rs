//! Brokerage gateway port trait.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::decision::{OrderInstruction, Position, Quote};
use crate::domain::error::TraderError;

/// Capability interface for the brokerage connection.
///
/// Connection lifecycle, contract qualification and order routing live behind
/// this trait; the core only reads account facts and submits instructions.
#[async_trait]
pub trait BrokerPort: Send + Sync {
    async fn connect(&self) -> Result<(), TraderError>;

    /// Account buying power in currency units.
    async fn buying_power(&self) -> Result<f64, TraderError>;

    /// Open position for a symbol, if any.
    async fn position_for(&self, symbol: &str) -> Result<Option<Position>, TraderError>;

    /// Current quote, waiting at most `timeout` for market data. An elapsed
    /// timeout is reported as [`TraderError::PriceUnavailable`].
    async fn quote(&self, symbol: &str, timeout: Duration) -> Result<Quote, TraderError>;

    async fn place_order(&self, order: &OrderInstruction) -> Result<(), TraderError>;
}
