//! HTTP request handlers for the signal endpoint.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::domain::decision::{Side, SkipReason};
use crate::domain::dispatch::OrderOutcome;

use super::{AppState, WebError};

#[derive(Debug, Deserialize)]
pub struct SignalRequest {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub ticker: String,
}

/// Success body: a status line describing what the signal did.
#[derive(Debug, Serialize)]
pub struct SignalResponse {
    pub status: &'static str,
}

pub async fn webhook(
    State(state): State<Arc<AppState>>,
    Json(signal): Json<SignalRequest>,
) -> Result<Json<SignalResponse>, WebError> {
    info!(action = %signal.action, ticker = %signal.ticker, "signal received");
    let outcome = state
        .dispatcher
        .dispatch(&signal.action, &signal.ticker)
        .await?;
    let status = match outcome {
        OrderOutcome::Placed {
            side: Side::Buy, ..
        } => "buy order placed",
        OrderOutcome::Placed {
            side: Side::Sell, ..
        } => "sell order placed",
        OrderOutcome::Skipped { reason } | OrderOutcome::NoOp { reason } => match reason {
            SkipReason::InsufficientFunds => "insufficient funds",
            SkipReason::NoPosition => "no position to sell",
            SkipReason::BelowThreshold => "profit below threshold",
        },
    };
    Ok(Json(SignalResponse { status }))
}
