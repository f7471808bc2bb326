//! Fallback notifier that writes to the log.
//!
//! Used when no Telegram chat is configured, so paper runs still show where
//! notifications would have gone.

use async_trait::async_trait;
use tracing::info;

use crate::domain::error::TraderError;
use crate::ports::notifier_port::NotifierPort;

pub struct LogNotifier;

#[async_trait]
impl NotifierPort for LogNotifier {
    async fn notify(&self, text: &str) -> Result<(), TraderError> {
        info!(%text, "notification");
        Ok(())
    }
}
