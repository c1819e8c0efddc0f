use std::{fmt, time::Duration};

use enum_iterator::{all, Sequence};
use reqwest::Url;
use serde::Deserialize;

use crate::env::deserialize_url;

use super::chain::ChainConfig;

#[derive(Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub telegram_app_bot_token: String,
    pub telegram_chat_id: String,
    #[serde(default = "default_telegram_api_url", deserialize_with = "deserialize_url")]
    pub telegram_api_url: Url,
    #[serde(deserialize_with = "deserialize_url")]
    pub eth_rpc_url: Url,
    #[serde(deserialize_with = "deserialize_url")]
    pub arbitrum_rpc_url: Url,
    #[serde(deserialize_with = "deserialize_url")]
    pub base_rpc_url: Url,
    #[serde(deserialize_with = "deserialize_url")]
    pub bsc_rpc_url: Url,
    #[serde(default = "default_rpc_timeout_seconds")]
    pub rpc_timeout_seconds: u64,
    #[serde(default = "default_telegram_timeout_seconds")]
    pub telegram_timeout_seconds: u64,
}

fn default_telegram_api_url() -> Url {
    Url::parse("https://api.telegram.org").expect("static telegram api url to be valid")
}

fn default_rpc_timeout_seconds() -> u64 {
    30
}

fn default_telegram_timeout_seconds() -> u64 {
    30
}

/// Networks every wallet is checked on, in poll order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Sequence)]
pub enum Network {
    Ethereum,
    Arbitrum,
    Base,
    Bsc,
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let str = match &self {
            Network::Ethereum => "Ethereum",
            Network::Arbitrum => "Arbitrum",
            Network::Base => "Base",
            Network::Bsc => "BSC",
        };
        write!(f, "{}", str)
    }
}

impl AppConfig {
    pub fn rpc_url(&self, network: Network) -> &Url {
        match network {
            Network::Ethereum => &self.eth_rpc_url,
            Network::Arbitrum => &self.arbitrum_rpc_url,
            Network::Base => &self.base_rpc_url,
            Network::Bsc => &self.bsc_rpc_url,
        }
    }

    pub fn chains(&self) -> Vec<ChainConfig> {
        all::<Network>()
            .map(|network| ChainConfig::new(network.to_string(), self.rpc_url(network).clone()))
            .collect()
    }

    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout_seconds)
    }

    pub fn telegram_timeout(&self) -> Duration {
        Duration::from_secs(self.telegram_timeout_seconds)
    }
}
