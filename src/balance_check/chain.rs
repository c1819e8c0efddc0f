mod json_rpc;

pub use json_rpc::JsonRpcBalanceClient;

use alloy::primitives::U256;
use async_trait::async_trait;
use reqwest::Url;
use thiserror::Error;

/// A network to poll, in the order it appears in the configured list.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainConfig {
    pub name: String,
    pub rpc_url: Url,
}

impl ChainConfig {
    pub fn new(name: impl Into<String>, rpc_url: Url) -> Self {
        Self {
            name: name.into(),
            rpc_url,
        }
    }
}

#[derive(Debug, Error)]
pub enum BalanceError {
    /// The endpoint could not be reached or refused the request.
    #[error("failed to connect to {url}: {message}")]
    Connection { url: String, message: String },
    /// The endpoint answered but the balance query failed.
    #[error("failed to get balance: {0}")]
    Query(String),
}

#[async_trait]
pub trait BalanceClient {
    /// Native balance of `address` at the latest block, in the chain's smallest unit.
    async fn get_balance(&self, rpc_url: &Url, address: &str) -> Result<U256, BalanceError>;
}
