#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use sigtrader::domain::decision::{OrderInstruction, Position, Quote};
use sigtrader::domain::error::TraderError;
use sigtrader::domain::preset::Preset;
use sigtrader::domain::store::PresetStore;
use sigtrader::ports::broker_port::BrokerPort;
use sigtrader::ports::notifier_port::NotifierPort;
use sigtrader::ports::store_port::PresetBackend;

/// In-memory preset backend for tests that do not care about durability.
pub struct MemoryBackend;

impl PresetBackend for MemoryBackend {
    fn load(&self) -> Result<HashMap<String, Preset>, TraderError> {
        Ok(HashMap::new())
    }

    fn save(&self, _presets: &HashMap<String, Preset>) -> Result<(), TraderError> {
        Ok(())
    }
}

/// Recording brokerage mock with seedable account facts.
#[derive(Default)]
pub struct MockBroker {
    pub calls: Mutex<Vec<String>>,
    pub orders: Mutex<Vec<OrderInstruction>>,
    pub buying_power: f64,
    pub positions: HashMap<String, Position>,
    pub quotes: HashMap<String, Quote>,
    pub fail_connect: bool,
    pub fail_quote: bool,
}

impl MockBroker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_buying_power(mut self, buying_power: f64) -> Self {
        self.buying_power = buying_power;
        self
    }

    pub fn with_quote(mut self, symbol: &str, last: f64) -> Self {
        self.quotes.insert(
            symbol.to_string(),
            Quote {
                last: Some(last),
                close: None,
            },
        );
        self
    }

    pub fn with_position(mut self, symbol: &str, quantity: f64, avg_cost: f64) -> Self {
        self.positions
            .insert(symbol.to_string(), Position { quantity, avg_cost });
        self
    }

    pub fn with_connect_error(mut self) -> Self {
        self.fail_connect = true;
        self
    }

    pub fn with_quote_error(mut self) -> Self {
        self.fail_quote = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn orders(&self) -> Vec<OrderInstruction> {
        self.orders.lock().unwrap().clone()
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }
}

#[async_trait]
impl BrokerPort for MockBroker {
    async fn connect(&self) -> Result<(), TraderError> {
        self.record("connect");
        if self.fail_connect {
            return Err(TraderError::BrokerUnavailable {
                reason: "connection refused".into(),
            });
        }
        Ok(())
    }

    async fn buying_power(&self) -> Result<f64, TraderError> {
        self.record("buying_power");
        Ok(self.buying_power)
    }

    async fn position_for(&self, symbol: &str) -> Result<Option<Position>, TraderError> {
        self.record("position_for");
        Ok(self.positions.get(symbol).cloned())
    }

    async fn quote(&self, symbol: &str, _timeout: Duration) -> Result<Quote, TraderError> {
        self.record("quote");
        if self.fail_quote {
            return Err(TraderError::PriceUnavailable {
                symbol: symbol.to_string(),
            });
        }
        Ok(self.quotes.get(symbol).copied().unwrap_or_default())
    }

    async fn place_order(&self, order: &OrderInstruction) -> Result<(), TraderError> {
        self.record("place_order");
        self.orders.lock().unwrap().push(order.clone());
        Ok(())
    }
}

/// Recording notifier mock.
#[derive(Default)]
pub struct MockNotifier {
    pub messages: Mutex<Vec<String>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotifierPort for MockNotifier {
    async fn notify(&self, text: &str) -> Result<(), TraderError> {
        self.messages.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

pub fn make_preset(order_size: f64, min_profit_pct: f64) -> Preset {
    Preset {
        order_size,
        min_profit_pct,
    }
}

/// Store seeded in memory with the given presets.
pub fn make_store(presets: &[(&str, Preset)]) -> Arc<PresetStore> {
    let store = PresetStore::open(Box::new(MemoryBackend)).unwrap();
    for (symbol, preset) in presets {
        store.put(symbol, preset.clone()).unwrap();
    }
    Arc::new(store)
}
