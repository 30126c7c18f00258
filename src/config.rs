use crate::error::{config_error, env_error, BotResult};
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Default Telegram Bot API endpoint
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Default location of the last-seen event snapshot
pub const DEFAULT_SNAPSHOT_PATH: &str = ".cache/last_events.json";

/// Default lookahead window in days
pub const DEFAULT_LOOKAHEAD_DAYS: i64 = 7;

/// Longest accepted lookahead window in days
pub const MAX_LOOKAHEAD_DAYS: i64 = 366;

/// Default report locale
pub const DEFAULT_LOCALE: &str = "vi";

/// Optional settings file merged over the environment
pub const SETTINGS_FILE: &str = "config/lichbot.toml";

/// Main configuration structure for a digest run
#[derive(Clone)]
pub struct Config {
    /// CalDAV calendar collection URL
    pub caldav_url: String,
    /// CalDAV basic auth user
    pub caldav_username: String,
    /// CalDAV basic auth password
    pub caldav_password: String,
    /// Telegram bot token
    pub telegram_token: String,
    /// Telegram chat the digest is posted to
    pub telegram_chat_id: String,
    /// Telegram Bot API base URL
    pub telegram_api_url: String,
    /// Snapshot file used when no Redis URL is set
    pub snapshot_path: PathBuf,
    /// Redis URL for snapshot storage
    pub snapshot_redis_url: Option<String>,
    /// How many days ahead to query
    pub lookahead_days: i64,
    /// Report locale
    pub locale: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("caldav_url", &self.caldav_url)
            .field("caldav_username", &self.caldav_username)
            .field("caldav_password", &"<redacted>")
            .field("telegram_token", &"<redacted>")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .field("telegram_api_url", &self.telegram_api_url)
            .field("snapshot_path", &self.snapshot_path)
            .field("snapshot_redis_url", &self.snapshot_redis_url)
            .field("lookahead_days", &self.lookahead_days)
            .field("locale", &self.locale)
            .finish()
    }
}

/// Non-secret overrides read from the settings file
#[derive(Debug, Default, Deserialize)]
pub struct FileSettings {
    pub lookahead_days: Option<i64>,
    pub snapshot_path: Option<PathBuf>,
    pub locale: Option<String>,
}

impl Config {
    /// Load configuration from environment and config file
    pub fn load() -> BotResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let mut config = Self::from_lookup(|key| env::var(key).ok())?;
        config.apply_settings_file(Path::new(SETTINGS_FILE))?;
        Ok(config)
    }

    /// Build configuration from a variable lookup function
    pub fn from_lookup<F>(lookup: F) -> BotResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).ok_or_else(|| env_error(key));

        let caldav_url = required("CAL_URL")?;
        let caldav_username = required("CAL_USER")?;
        let caldav_password = required("CAL_PASS")?;
        let telegram_token = required("TG_TOKEN")?;
        let telegram_chat_id = required("TG_CHAT_ID")?;

        let telegram_api_url = lookup("TG_API_URL")
            .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string());
        let snapshot_path = lookup("SNAPSHOT_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SNAPSHOT_PATH));
        let snapshot_redis_url = lookup("SNAPSHOT_REDIS_URL").filter(|url| !url.trim().is_empty());

        let lookahead_days = match lookup("LOOKAHEAD_DAYS") {
            Some(value) => value
                .trim()
                .parse::<i64>()
                .map_err(|_| config_error(&format!("Invalid LOOKAHEAD_DAYS format: {}", value)))?,
            None => DEFAULT_LOOKAHEAD_DAYS,
        };

        let locale = lookup("BOT_LOCALE").unwrap_or_else(|| DEFAULT_LOCALE.to_string());

        let config = Config {
            caldav_url,
            caldav_username,
            caldav_password,
            telegram_token,
            telegram_chat_id,
            telegram_api_url,
            snapshot_path,
            snapshot_redis_url,
            lookahead_days,
            locale,
        };
        config.validate()?;
        Ok(config)
    }

    /// Merge overrides from a TOML settings file, if it exists
    pub fn apply_settings_file(&mut self, path: &Path) -> BotResult<()> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        let settings: FileSettings = toml::from_str(&content)?;
        self.apply_settings(settings)
    }

    /// Merge already parsed overrides
    pub fn apply_settings(&mut self, settings: FileSettings) -> BotResult<()> {
        if let Some(days) = settings.lookahead_days {
            self.lookahead_days = days;
        }
        if let Some(path) = settings.snapshot_path {
            self.snapshot_path = path;
        }
        if let Some(locale) = settings.locale {
            self.locale = locale;
        }
        self.validate()
    }

    fn validate(&self) -> BotResult<()> {
        if self.lookahead_days <= 0 {
            return Err(config_error("lookahead_days must be positive"));
        }
        if self.lookahead_days > MAX_LOOKAHEAD_DAYS {
            return Err(config_error(&format!(
                "lookahead_days must be at most {}, got {}",
                MAX_LOOKAHEAD_DAYS, self.lookahead_days
            )));
        }
        if self.caldav_url.trim().is_empty() {
            return Err(config_error("CAL_URL must not be empty"));
        }
        Ok(())
    }
}
