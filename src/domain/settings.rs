//! Runtime settings loaded from an INI config file.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use configparser::ini::Ini;

use crate::domain::error::TraderError;

const DEFAULT_LISTEN: &str = "127.0.0.1:5000";
const DEFAULT_STORE_PATH: &str = "presets.json";
const DEFAULT_QUOTE_TIMEOUT_SECS: u64 = 2;
const DEFAULT_PAPER_BUYING_POWER: f64 = 100_000.0;

/// Telegram transport settings. Absent when no token is configured; the bot
/// then runs with the signal endpoint only and notifications go to the log.
#[derive(Debug, Clone, PartialEq)]
pub struct TelegramSettings {
    pub token: String,
    pub chat_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Address the signal endpoint binds to.
    pub listen: SocketAddr,
    /// Path of the durable preset file.
    pub store_path: PathBuf,
    /// How long to wait for market data before treating the price as
    /// unavailable.
    pub quote_timeout: Duration,
    /// Seed buying power for the paper brokerage.
    pub paper_buying_power: f64,
    pub telegram: Option<TelegramSettings>,
}

impl Settings {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TraderError> {
        let mut ini = Ini::new();
        ini.load(&path).map_err(|reason| TraderError::ConfigParse {
            file: path.as_ref().display().to_string(),
            reason,
        })?;
        Self::from_ini(&ini)
    }

    pub fn from_ini(ini: &Ini) -> Result<Self, TraderError> {
        let listen = match ini.get("server", "listen") {
            Some(raw) => raw.parse().map_err(|_| TraderError::ConfigInvalid {
                section: "server".into(),
                key: "listen".into(),
                reason: format!("not a socket address: {raw}"),
            })?,
            None => DEFAULT_LISTEN.parse().unwrap(),
        };

        let store_path = ini
            .get("store", "path")
            .unwrap_or_else(|| DEFAULT_STORE_PATH.to_string())
            .into();

        let quote_timeout_secs = ini
            .getuint("broker", "quote_timeout_secs")
            .map_err(|reason| TraderError::ConfigInvalid {
                section: "broker".into(),
                key: "quote_timeout_secs".into(),
                reason,
            })?
            .unwrap_or(DEFAULT_QUOTE_TIMEOUT_SECS);
        if quote_timeout_secs == 0 {
            return Err(TraderError::ConfigInvalid {
                section: "broker".into(),
                key: "quote_timeout_secs".into(),
                reason: "must be at least 1".into(),
            });
        }

        let paper_buying_power = ini
            .getfloat("paper", "buying_power")
            .map_err(|reason| TraderError::ConfigInvalid {
                section: "paper".into(),
                key: "buying_power".into(),
                reason,
            })?
            .unwrap_or(DEFAULT_PAPER_BUYING_POWER);

        let telegram = match ini.get("telegram", "token") {
            Some(token) => {
                let chat_id = ini.get("telegram", "chat_id").ok_or_else(|| {
                    TraderError::ConfigMissing {
                        section: "telegram".into(),
                        key: "chat_id".into(),
                    }
                })?;
                Some(TelegramSettings { token, chat_id })
            }
            None => None,
        };

        Ok(Settings {
            listen,
            store_path,
            quote_timeout: Duration::from_secs(quote_timeout_secs),
            paper_buying_power,
            telegram,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn from_str(content: &str) -> Result<Settings, TraderError> {
        let mut ini = Ini::new();
        ini.read(content.to_string()).unwrap();
        Settings::from_ini(&ini)
    }

    #[test]
    fn empty_config_uses_defaults() {
        let settings = from_str("").unwrap();
        assert_eq!(settings.listen, DEFAULT_LISTEN.parse::<SocketAddr>().unwrap());
        assert_eq!(settings.store_path, PathBuf::from("presets.json"));
        assert_eq!(settings.quote_timeout, Duration::from_secs(2));
        assert_eq!(settings.paper_buying_power, 100_000.0);
        assert_eq!(settings.telegram, None);
    }

    #[test]
    fn full_config_parses() {
        let settings = from_str(
            r#"
[server]
listen = 0.0.0.0:8080

[store]
path = /var/lib/sigtrader/presets.json

[broker]
quote_timeout_secs = 5

[paper]
buying_power = 25000

[telegram]
token = 123:abc
chat_id = 42
"#,
        )
        .unwrap();

        assert_eq!(settings.listen, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(
            settings.store_path,
            PathBuf::from("/var/lib/sigtrader/presets.json")
        );
        assert_eq!(settings.quote_timeout, Duration::from_secs(5));
        assert_eq!(settings.paper_buying_power, 25000.0);
        assert_eq!(
            settings.telegram,
            Some(TelegramSettings {
                token: "123:abc".into(),
                chat_id: "42".into(),
            })
        );
    }

    #[test]
    fn invalid_listen_address_is_rejected() {
        let err = from_str("[server]\nlisten = not-an-address\n").unwrap_err();
        assert!(matches!(err, TraderError::ConfigInvalid { .. }));
    }

    #[test]
    fn zero_quote_timeout_is_rejected() {
        let err = from_str("[broker]\nquote_timeout_secs = 0\n").unwrap_err();
        assert!(matches!(err, TraderError::ConfigInvalid { .. }));
    }

    #[test]
    fn non_numeric_quote_timeout_is_rejected() {
        let err = from_str("[broker]\nquote_timeout_secs = soon\n").unwrap_err();
        assert!(matches!(err, TraderError::ConfigInvalid { .. }));
    }

    #[test]
    fn telegram_token_without_chat_id_is_rejected() {
        let err = from_str("[telegram]\ntoken = 123:abc\n").unwrap_err();
        assert!(matches!(
            err,
            TraderError::ConfigMissing { ref section, ref key }
                if section.as_str() == "telegram" && key.as_str() == "chat_id"
        ));
    }

    #[test]
    fn from_file_reads_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[server]\nlisten = 127.0.0.1:9000\n").unwrap();
        let settings = Settings::from_file(file.path()).unwrap();
        assert_eq!(settings.listen, "127.0.0.1:9000".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = Settings::from_file("/nonexistent/sigtrader.ini");
        assert!(matches!(result, Err(TraderError::ConfigParse { .. })));
    }
}
