use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Environment error: {0}")]
    #[diagnostic(code(lichbot::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(lichbot::config))]
    Config(String),

    #[error("CalDAV error: {0}")]
    #[diagnostic(code(lichbot::caldav))]
    CalDav(String),

    #[error("Telegram API error: {0}")]
    #[diagnostic(code(lichbot::telegram))]
    Telegram(String),

    #[error("Snapshot error: {0}")]
    #[diagnostic(code(lichbot::snapshot))]
    Snapshot(String),

    #[error(transparent)]
    #[diagnostic(code(lichbot::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(lichbot::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(lichbot::other))]
    Other(String),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type BotResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create CalDAV errors
pub fn caldav_error(message: &str) -> Error {
    Error::CalDav(message.to_string())
}

/// Helper to create Telegram errors
pub fn telegram_error(message: &str) -> Error {
    Error::Telegram(message.to_string())
}

/// Helper to create snapshot storage errors
pub fn snapshot_error(message: &str) -> Error {
    Error::Snapshot(message.to_string())
}

/// Helper to create other errors
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
