//! Telegram adapter: operator notifications and the configuration dialogue
//! transport.
//!
//! Notifications go out through `sendMessage`; the dialogue is driven by a
//! `getUpdates` long-poll loop. `/set` begins a configuration session,
//! `/cancel` cancels it, and any other non-command text feeds the current
//! step, mirroring how the dialogue prompts are worded.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::dialogue::DialogueManager;
use crate::domain::error::TraderError;
use crate::domain::settings::TelegramSettings;
use crate::ports::notifier_port::NotifierPort;

const API_BASE: &str = "https://api.telegram.org";
const POLL_TIMEOUT_SECS: u64 = 30;
const RETRY_DELAY: Duration = Duration::from_secs(5);

pub struct TelegramNotifier {
    client: reqwest::Client,
    token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(settings: &TelegramSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            token: settings.token.clone(),
            chat_id: settings.chat_id.clone(),
        }
    }
}

#[async_trait]
impl NotifierPort for TelegramNotifier {
    async fn notify(&self, text: &str) -> Result<(), TraderError> {
        self.client
            .post(format!("{API_BASE}/bot{}/sendMessage", self.token))
            .json(&serde_json::json!({
                "chat_id": self.chat_id,
                "text": text,
            }))
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| TraderError::Notify {
                reason: e.to_string(),
            })?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct UpdatesResponse {
    result: Vec<Update>,
}

#[derive(Debug, Deserialize)]
struct Update {
    update_id: i64,
    message: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    chat: Chat,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Chat {
    id: i64,
}

/// Long-polls `getUpdates` and feeds incoming messages to the dialogue.
pub struct TelegramPoller {
    client: reqwest::Client,
    token: String,
    dialogue: Arc<DialogueManager>,
}

impl TelegramPoller {
    pub fn new(settings: &TelegramSettings, dialogue: Arc<DialogueManager>) -> Self {
        Self {
            client: reqwest::Client::new(),
            token: settings.token.clone(),
            dialogue,
        }
    }

    pub async fn run(self) {
        let mut offset: i64 = 0;
        loop {
            match self.poll(offset).await {
                Ok(updates) => {
                    for update in updates {
                        offset = offset.max(update.update_id + 1);
                        let Some(message) = update.message else {
                            continue;
                        };
                        if let Some(reply) = self.handle(&message) {
                            self.reply(message.chat.id, &reply).await;
                        }
                    }
                }
                Err(err) => {
                    warn!(%err, "telegram poll failed");
                    tokio::time::sleep(RETRY_DELAY).await;
                }
            }
        }
    }

    async fn poll(&self, offset: i64) -> Result<Vec<Update>, reqwest::Error> {
        let response: UpdatesResponse = self
            .client
            .get(format!("{API_BASE}/bot{}/getUpdates", self.token))
            .query(&[("offset", offset), ("timeout", POLL_TIMEOUT_SECS as i64)])
            .timeout(Duration::from_secs(POLL_TIMEOUT_SECS + 10))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response.result)
    }

    /// Route one message. Commands other than `/set` and `/cancel` are
    /// ignored, as is free text when no session is active.
    fn handle(&self, message: &Message) -> Option<String> {
        let text = message.text.as_deref()?.trim();
        let operator = message.chat.id;
        match text {
            "/set" => Some(self.dialogue.begin(operator)),
            "/cancel" => Some(self.dialogue.cancel(operator)),
            _ if text.starts_with('/') => None,
            _ => self.dialogue.input(operator, text),
        }
    }

    async fn reply(&self, chat_id: i64, text: &str) {
        let result = self
            .client
            .post(format!("{API_BASE}/bot{}/sendMessage", self.token))
            .json(&serde_json::json!({
                "chat_id": chat_id,
                "text": text,
            }))
            .send()
            .await
            .and_then(|response| response.error_for_status());
        match result {
            Ok(_) => debug!(chat_id, "dialogue reply sent"),
            Err(err) => warn!(%err, chat_id, "dialogue reply failed"),
        }
    }
}
