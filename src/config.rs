use std::env;
use std::path::PathBuf;
use std::time::Duration;

use teloxide::types::UserId;

const REQUIRED_VARS: [&str; 2] = ["TELOXIDE_TOKEN", "ADMIN_ID"];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Runtime settings for the bot, read once at startup.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub admin_id: UserId,
    pub database_path: PathBuf,
    pub translations_dir: PathBuf,
    pub default_language: String,
    pub broadcast_concurrency: usize,
    pub send_timeout: Duration,
}

/// Loads `.env` (if present) and checks that the variables the bot cannot run without exist.
pub fn load_environment() -> Result<(), ConfigError> {
    if dotenv::dotenv().is_err() {
        log::debug!("No .env file found, using process environment only");
    }

    for name in REQUIRED_VARS {
        if env::var(name).map_or(true, |v| v.trim().is_empty()) {
            return Err(ConfigError::Missing(name));
        }
    }
    Ok(())
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let admin_raw = get("ADMIN_ID").ok_or(ConfigError::Missing("ADMIN_ID"))?;
        let admin_id = admin_raw
            .parse::<u64>()
            .map(UserId)
            .map_err(|_| ConfigError::Invalid { name: "ADMIN_ID", value: admin_raw.clone() })?;

        let broadcast_concurrency = parse_positive(get("BROADCAST_CONCURRENCY"), "BROADCAST_CONCURRENCY", 4)?;
        let timeout_secs = parse_positive(get("BROADCAST_SEND_TIMEOUT_SECS"), "BROADCAST_SEND_TIMEOUT_SECS", 15)?;

        Ok(Self {
            admin_id,
            database_path: get("DATABASE_PATH").unwrap_or_else(|| "broadcastbot.db".to_string()).into(),
            translations_dir: get("TRANSLATIONS_DIR").unwrap_or_else(|| "translations".to_string()).into(),
            default_language: get("DEFAULT_LANGUAGE").unwrap_or_else(|| "en".to_string()).to_lowercase(),
            broadcast_concurrency,
            send_timeout: Duration::from_secs(timeout_secs as u64),
        })
    }
}

fn parse_positive(raw: Option<String>, name: &'static str, default: usize) -> Result<usize, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => match value.parse::<usize>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(ConfigError::Invalid { name, value }),
        },
    }
}
