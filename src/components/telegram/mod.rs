use crate::components::Notifier;
use crate::config::Config;
use crate::error::{telegram_error, BotResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;
use url::Url;

/// Parse mode matching the digest's escaping rules
pub const PARSE_MODE: &str = "MarkdownV2";

/// Body of a Bot API `sendMessage` call
#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

/// Envelope of every Bot API response
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Posts digests to a Telegram chat through the Bot API
#[derive(Clone)]
pub struct TelegramNotifier {
    api_url: String,
    token: String,
    chat_id: String,
    client: Client,
}

impl TelegramNotifier {
    pub fn new(api_url: &str, token: &str, chat_id: &str) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            chat_id: chat_id.to_string(),
            client: Client::new(),
        }
    }

    /// Create a notifier from the run configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.telegram_api_url, &config.telegram_token, &config.telegram_chat_id)
    }

    fn method_url(&self, method: &str) -> BotResult<Url> {
        // The token is part of the path, keep it out of error messages
        Url::parse(&format!("{}/bot{}/{}", self.api_url, self.token, method))
            .map_err(|e| telegram_error(&format!("Invalid Telegram API URL: {}", e)))
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send_message(&self, text: &str) -> BotResult<()> {
        let request = SendMessageRequest {
            chat_id: &self.chat_id,
            text,
            parse_mode: PARSE_MODE,
        };

        let response = self
            .client
            .post(self.method_url("sendMessage")?)
            .json(&request)
            .send()
            .await
            .map_err(|e| telegram_error(&format!("Failed to send message: {}", e.without_url())))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| telegram_error(&format!("Failed to read response: {}", e.without_url())))?;

        let parsed: Option<ApiResponse> = serde_json::from_str(&body).ok();
        match parsed {
            Some(api) if status.is_success() && api.ok => {
                info!("Delivered digest to Telegram chat {}", self.chat_id);
                Ok(())
            }
            Some(api) => Err(telegram_error(&format!(
                "Failed to send message: HTTP {} - {}",
                status,
                api.description.unwrap_or_else(|| "no description".to_string())
            ))),
            None => Err(telegram_error(&format!(
                "Failed to send message: HTTP {} - unexpected response body",
                status
            ))),
        }
    }
}
