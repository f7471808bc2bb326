//! Configuration dialogue: a per-operator state machine that collects a new
//! preset (ticker, order size, minimum profit) one answer at a time.
//!
//! The transition function ([`Step::advance`]) is pure; applying the store
//! effect at completion is the [`DialogueManager`]'s job. That keeps every
//! transition unit-testable without a chat transport.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::domain::preset::{normalize_symbol, Preset};
use crate::domain::store::PresetStore;

/// Operator identifier. The Telegram transport uses the chat id; the
/// terminal transport uses a fixed id.
pub type OperatorId = i64;

const PROMPT_TICKER: &str = "Enter the ticker symbol (e.g., AAPL):";
const PROMPT_SIZE: &str = "Enter order size in USD (e.g., 500):";
const PROMPT_PROFIT: &str = "Enter minimum profit percentage (e.g., 3.5):";
const INVALID_SIZE: &str = "Invalid size. Please enter a numeric value:";
const INVALID_PROFIT: &str = "Invalid percentage. Enter a number:";
const CANCELLED: &str = "Configuration cancelled.";

/// Where a session is in the conversation. Collected fields ride along in
/// the state itself, so a session is always internally consistent.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    AwaitingTicker,
    AwaitingSize { ticker: String },
    AwaitingProfit { ticker: String, size: f64 },
}

/// Result of feeding one operator answer to a step.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Advance to the next step; `reply` prompts for the following field.
    Next { step: Step, reply: String },
    /// Stay in the same step; the input failed validation.
    Stay { step: Step, reply: String },
    /// All fields collected. Persisting the preset is up to the caller.
    Complete { symbol: String, preset: Preset },
}

impl Step {
    /// Advance with one line of operator input.
    ///
    /// Any text is accepted as a ticker; size and profit must parse as
    /// numbers, and a failed parse re-prompts without losing progress.
    pub fn advance(self, input: &str) -> Transition {
        match self {
            Step::AwaitingTicker => Transition::Next {
                step: Step::AwaitingSize {
                    ticker: normalize_symbol(input),
                },
                reply: PROMPT_SIZE.to_string(),
            },
            Step::AwaitingSize { ticker } => match input.trim().parse::<f64>() {
                Ok(size) => Transition::Next {
                    step: Step::AwaitingProfit { ticker, size },
                    reply: PROMPT_PROFIT.to_string(),
                },
                Err(_) => Transition::Stay {
                    step: Step::AwaitingSize { ticker },
                    reply: INVALID_SIZE.to_string(),
                },
            },
            Step::AwaitingProfit { ticker, size } => match input.trim().parse::<f64>() {
                Ok(profit) => Transition::Complete {
                    symbol: ticker,
                    preset: Preset {
                        order_size: size,
                        min_profit_pct: profit,
                    },
                },
                Err(_) => Transition::Stay {
                    step: Step::AwaitingProfit { ticker, size },
                    reply: INVALID_PROFIT.to_string(),
                },
            },
        }
    }
}

/// Per-operator dialogue sessions plus the store effect at completion.
pub struct DialogueManager {
    store: Arc<PresetStore>,
    sessions: Mutex<HashMap<OperatorId, Step>>,
}

impl DialogueManager {
    pub fn new(store: Arc<PresetStore>) -> Self {
        Self {
            store,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Start a fresh session, discarding any incomplete one for this operator.
    pub fn begin(&self, operator: OperatorId) -> String {
        self.sessions
            .lock()
            .unwrap()
            .insert(operator, Step::AwaitingTicker);
        PROMPT_TICKER.to_string()
    }

    /// Cancel the session, if any, discarding collected fields.
    pub fn cancel(&self, operator: OperatorId) -> String {
        self.sessions.lock().unwrap().remove(&operator);
        CANCELLED.to_string()
    }

    pub fn is_active(&self, operator: OperatorId) -> bool {
        self.sessions.lock().unwrap().contains_key(&operator)
    }

    /// Feed one line of operator input to the session. Returns `None` when
    /// no session is active for the operator.
    ///
    /// On completion the preset is written through the store. A failed save
    /// keeps the session in the profit step so the operator can retry with
    /// the same answer.
    pub fn input(&self, operator: OperatorId, text: &str) -> Option<String> {
        let step = self.sessions.lock().unwrap().remove(&operator)?;
        match step.advance(text) {
            Transition::Next { step, reply } | Transition::Stay { step, reply } => {
                self.sessions.lock().unwrap().insert(operator, step);
                Some(reply)
            }
            Transition::Complete { symbol, preset } => {
                match self.store.put(&symbol, preset.clone()) {
                    Ok(()) => Some(format!(
                        "Config saved for {symbol}:\nOrder Size: ${size}\nMin Profit: {profit}%",
                        size = preset.order_size,
                        profit = preset.min_profit_pct,
                    )),
                    Err(err) => {
                        self.sessions.lock().unwrap().insert(
                            operator,
                            Step::AwaitingProfit {
                                ticker: symbol,
                                size: preset.order_size,
                            },
                        );
                        Some(format!(
                            "Could not save the preset ({err}). Enter the minimum profit percentage to retry:"
                        ))
                    }
                }
            }
        }
    }
}
