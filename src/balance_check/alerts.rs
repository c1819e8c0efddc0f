pub mod telegram;

pub use telegram::TelegramBot;

use async_trait::async_trait;
use indoc::formatdoc;
use reqwest::StatusCode;
use thiserror::Error;

const DEBANK_PROFILE_URL: &str = "https://debank.com/profile";

#[derive(Debug, Error)]
pub enum SendError {
    #[error("failed to send message: {0}")]
    Request(#[from] reqwest::Error),
    #[error("message rejected, status: {status}, body: {body}")]
    Rejected { status: StatusCode, body: String },
}

#[async_trait]
pub trait NotificationSink {
    /// Delivers preformatted `text` to `destination`.
    async fn send(&self, destination: &str, text: &str) -> Result<(), SendError>;
}

pub fn profile_url(address: &str) -> String {
    format!("{}/{}", DEBANK_PROFILE_URL, address)
}

pub fn balance_found_message(chain: &str, address: &str) -> String {
    let url = profile_url(address);
    formatdoc!(
        "
        💰 Found a wallet with a balance!

        Chain: {chain}
        Address: {address}

        View on DeBank:
        {url}"
    )
}
