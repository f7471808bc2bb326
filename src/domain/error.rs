//! Domain error types.
//!
//! Business skips (insufficient funds, no position, profit below threshold)
//! are deliberately not errors; they live in
//! [`SkipReason`](crate::domain::decision::SkipReason).

/// Top-level error type for sigtrader.
#[derive(Debug, thiserror::Error)]
pub enum TraderError {
    #[error("no preset configured for {symbol}")]
    UnknownSymbol { symbol: String },

    #[error("unknown action: {action}")]
    UnknownAction { action: String },

    #[error("broker unavailable: {reason}")]
    BrokerUnavailable { reason: String },

    #[error("price unavailable for {symbol}")]
    PriceUnavailable { symbol: String },

    #[error("position in {symbol} has zero average cost")]
    InvalidPosition { symbol: String },

    #[error("failed to load presets from {file}: {reason}")]
    PresetLoad { file: String, reason: String },

    #[error("failed to save presets: {reason}")]
    PresetSave { reason: String },

    #[error("notification failed: {reason}")]
    Notify { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TraderError> for std::process::ExitCode {
    fn from(err: &TraderError) -> Self {
        let code: u8 = match err {
            TraderError::Io(_) => 1,
            TraderError::ConfigParse { .. }
            | TraderError::ConfigMissing { .. }
            | TraderError::ConfigInvalid { .. } => 2,
            TraderError::PresetLoad { .. } | TraderError::PresetSave { .. } => 3,
            TraderError::UnknownSymbol { .. } | TraderError::UnknownAction { .. } => 4,
            TraderError::BrokerUnavailable { .. }
            | TraderError::PriceUnavailable { .. }
            | TraderError::InvalidPosition { .. }
            | TraderError::Notify { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
