//! Web server adapter: the inbound signal endpoint.
//!
//! Exposes a single JSON webhook that turns alert payloads into dispatched
//! orders. Responses carry either a `status` field (an outcome, including
//! the deliberate no-action ones) or an `error` field, never both.

mod error;
mod handlers;

pub use error::WebError;
pub use handlers::{SignalRequest, SignalResponse};

use axum::{routing::post, Router};
use std::sync::Arc;

use crate::domain::dispatch::Dispatcher;

pub struct AppState {
    pub dispatcher: Dispatcher,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/webhook", post(handlers::webhook))
        .with_state(Arc::new(state))
}
