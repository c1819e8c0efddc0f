use std::{fmt, time::Duration};

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, warn};

use super::{NotificationSink, SendError};

// Used to escape characters in telegram messages.
// https://core.telegram.org/bots/api#markdownv2-style
pub fn escape_str(input: &str) -> String {
    let mut output = String::new();
    for c in input.chars() {
        match c {
            '_' | '*' | '[' | ']' | '(' | ')' | '~' | '`' | '>' | '#' | '+' | '-' | '=' | '|'
            | '{' | '}' | '.' | '!' | '\\' => {
                output.push('\\');
            }
            _ => (),
        };
        output.push(c);
    }
    output
}

const TELEGRAM_MAX_MESSAGE_LENGTH: usize = 4096;
// Leave a little room for the escape characters.
pub const TELEGRAM_SAFE_MESSAGE_LENGTH: usize = TELEGRAM_MAX_MESSAGE_LENGTH - 2048;

/// Message text escaped for MarkdownV2 and cut to a length the Bot API accepts.
#[derive(Clone, Debug, PartialEq)]
pub struct TelegramText(String);

impl TelegramText {
    pub fn new(input: &str) -> Self {
        let escaped = escape_str(input);
        if escaped.chars().count() > TELEGRAM_SAFE_MESSAGE_LENGTH {
            warn!(
                "telegram message too long, truncating to {} characters",
                TELEGRAM_SAFE_MESSAGE_LENGTH
            );
            let mut truncated: String = escaped.chars().take(TELEGRAM_SAFE_MESSAGE_LENGTH).collect();
            // an odd run of trailing backslashes ends in a dangling escape
            let trailing = truncated.chars().rev().take_while(|c| *c == '\\').count();
            if trailing % 2 == 1 {
                truncated.pop();
            }
            Self(truncated)
        } else {
            Self(escaped)
        }
    }
}

impl fmt::Display for TelegramText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Deserialize)]
struct BotUser {
    username: Option<String>,
}

#[derive(Deserialize)]
struct GetMeResponse {
    result: BotUser,
}

pub struct TelegramBot {
    client: reqwest::Client,
    api_url: Url,
    token: String,
}

impl TelegramBot {
    pub fn new(
        api_url: Url,
        token: impl Into<String>,
        timeout: Duration,
    ) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_url,
            token: token.into(),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.api_url.as_str().trim_end_matches('/'),
            self.token,
            method
        )
    }

    async fn rejected(response: reqwest::Response) -> SendError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        SendError::Rejected { status, body }
    }

    /// Checks the token by asking the Bot API who we are.
    pub async fn get_me(&self) -> Result<String, SendError> {
        let response = self.client.get(self.method_url("getMe")).send().await?;

        if response.status() != StatusCode::OK {
            return Err(Self::rejected(response).await);
        }

        let me: GetMeResponse = response.json().await?;
        Ok(me.result.username.unwrap_or_default())
    }

    pub async fn send_message(&self, chat_id: &str, text: &TelegramText) -> Result<(), SendError> {
        let body = serde_json::json!({
            "chat_id": chat_id,
            "text": text.0,
            "parse_mode": "MarkdownV2",
            "disable_web_page_preview": true,
        });

        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&body)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                debug!(chat_id, "sent telegram message");
                Ok(())
            }
            _ => Err(Self::rejected(response).await),
        }
    }
}

#[async_trait]
impl NotificationSink for TelegramBot {
    async fn send(&self, destination: &str, text: &str) -> Result<(), SendError> {
        self.send_message(destination, &TelegramText::new(text))
            .await
    }
}
