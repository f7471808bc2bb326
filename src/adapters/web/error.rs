//! HTTP error responses for the signal endpoint.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::domain::error::TraderError;

/// Error body: a single error line, never paired with a status field.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug)]
pub struct WebError {
    pub status: StatusCode,
    pub message: String,
}

pub fn status_from_error(err: &TraderError) -> StatusCode {
    match err {
        TraderError::UnknownSymbol { .. } | TraderError::UnknownAction { .. } => {
            StatusCode::BAD_REQUEST
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<TraderError> for WebError {
    fn from(err: TraderError) -> Self {
        let status = status_from_error(&err);
        // Client errors keep the wording signal senders match on.
        let message = match &err {
            TraderError::UnknownSymbol { .. } => "Ticker not configured".to_string(),
            TraderError::UnknownAction { .. } => "Unknown action".to_string(),
            _ => err.to_string(),
        };
        Self { status, message }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}
