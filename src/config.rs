//! Run configuration, resolved once at startup.
//!
//! Credentials come from the environment (a `.env` file is honored). The
//! resulting `Config` is passed by reference to the fetcher, the store and the
//! notifier; nothing reads the environment after this point.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::AppError;

pub const ENV_FRED_API_KEY: &str = "FRED_API_KEY";
pub const ENV_TG_BOT_TOKEN: &str = "TG_BOT_TOKEN";
pub const ENV_TG_CHAT_ID: &str = "TG_CHAT_ID";
pub const ENV_HISTORY_PATH: &str = "LIQ_HISTORY_PATH";
pub const ENV_HTTP_TIMEOUT: &str = "LIQ_HTTP_TIMEOUT_SECS";

pub const DEFAULT_HISTORY_PATH: &str = "liquidity_history.csv";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Clone)]
pub struct Config {
    pub fred_api_key: String,
    pub tg_bot_token: String,
    pub tg_chat_id: String,
    pub history_path: PathBuf,
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String, AppError> {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| AppError::config(format!("Missing {key} in environment (.env).")))
        };

        let fred_api_key = required(ENV_FRED_API_KEY)?;
        let tg_bot_token = required(ENV_TG_BOT_TOKEN)?;
        let tg_chat_id = required(ENV_TG_CHAT_ID)?;

        let history_path = history_path_from_lookup(&lookup);

        let http_timeout = match lookup(ENV_HTTP_TIMEOUT) {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|_| {
                    AppError::config(format!("{ENV_HTTP_TIMEOUT} must be a whole number of seconds, got '{raw}'."))
                })?;
                if secs == 0 {
                    return Err(AppError::config(format!("{ENV_HTTP_TIMEOUT} must be > 0.")));
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        Ok(Self {
            fred_api_key,
            tg_bot_token,
            tg_chat_id,
            history_path,
            http_timeout,
        })
    }
}

/// History location for commands that need no credentials.
pub fn history_path_from_env() -> PathBuf {
    dotenvy::dotenv().ok();
    history_path_from_lookup(|key| std::env::var(key).ok())
}

fn history_path_from_lookup<F>(lookup: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    lookup(ENV_HISTORY_PATH)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_HISTORY_PATH))
}

// Secrets stay out of logs and panic messages.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("fred_api_key", &"<redacted>")
            .field("tg_bot_token", &"<redacted>")
            .field("tg_chat_id", &self.tg_chat_id)
            .field("history_path", &self.history_path)
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::error::EXIT_CONFIG;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn full() -> Vec<(&'static str, &'static str)> {
        vec![
            (ENV_FRED_API_KEY, "fred-key"),
            (ENV_TG_BOT_TOKEN, "123:abc"),
            (ENV_TG_CHAT_ID, "-1001"),
        ]
    }

    #[test]
    fn defaults_apply_when_optional_keys_absent() {
        let config = Config::from_lookup(lookup_from(&full())).unwrap();
        assert_eq!(config.fred_api_key, "fred-key");
        assert_eq!(config.tg_chat_id, "-1001");
        assert_eq!(config.history_path, PathBuf::from(DEFAULT_HISTORY_PATH));
        assert_eq!(config.http_timeout, Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS));
    }

    #[test]
    fn each_missing_credential_is_fatal() {
        for missing in [ENV_FRED_API_KEY, ENV_TG_BOT_TOKEN, ENV_TG_CHAT_ID] {
            let pairs: Vec<_> = full().into_iter().filter(|(k, _)| *k != missing).collect();
            let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();
            assert_eq!(err.exit_code(), EXIT_CONFIG);
            assert!(err.message().contains(missing), "{err}");
        }
    }

    #[test]
    fn blank_credential_counts_as_missing() {
        let mut pairs = full();
        pairs[0] = (ENV_FRED_API_KEY, "   ");
        assert!(Config::from_lookup(lookup_from(&pairs)).is_err());
    }

    #[test]
    fn optional_overrides_are_read() {
        let mut pairs = full();
        pairs.push((ENV_HISTORY_PATH, "data/h.csv"));
        pairs.push((ENV_HTTP_TIMEOUT, "5"));
        let config = Config::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.history_path, PathBuf::from("data/h.csv"));
        assert_eq!(config.http_timeout, Duration::from_secs(5));
    }

    #[test]
    fn bad_timeout_is_rejected() {
        for raw in ["abc", "0"] {
            let mut pairs = full();
            pairs.push((ENV_HTTP_TIMEOUT, raw));
            let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();
            assert_eq!(err.exit_code(), EXIT_CONFIG);
        }
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let config = Config::from_lookup(lookup_from(&full())).unwrap();
        let dbg = format!("{config:?}");
        assert!(!dbg.contains("fred-key"));
        assert!(!dbg.contains("123:abc"));
    }
}
