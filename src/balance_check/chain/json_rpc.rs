use std::time::Duration;

use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::{BalanceClient, BalanceError};

/// Queries `eth_getBalance` over HTTP JSON-RPC.
///
/// The underlying client keeps no idle connections, so each query dials the endpoint and the
/// connection is dropped once the response body has been read, whether or not the query
/// succeeded.
pub struct JsonRpcBalanceClient {
    client: reqwest::Client,
}

impl JsonRpcBalanceClient {
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(0)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }
}

#[derive(Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
struct RpcResponse {
    result: Option<String>,
    error: Option<RpcError>,
}

fn decode_quantity(quantity: &str) -> Result<U256, BalanceError> {
    let digits = quantity
        .strip_prefix("0x")
        .filter(|digits| !digits.is_empty())
        .ok_or_else(|| BalanceError::Query(format!("balance is not a hex quantity: {quantity}")))?;

    U256::from_str_radix(digits, 16)
        .map_err(|err| BalanceError::Query(format!("invalid balance {quantity}: {err}")))
}

#[async_trait]
impl BalanceClient for JsonRpcBalanceClient {
    async fn get_balance(&self, rpc_url: &Url, address: &str) -> Result<U256, BalanceError> {
        let address: Address = address
            .parse()
            .map_err(|err| BalanceError::Query(format!("invalid address {address}: {err}")))?;

        let payload = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "eth_getBalance",
            "params": [address.to_checksum(None), "latest"]
        });

        let connection_error = |message: String| BalanceError::Connection {
            url: rpc_url.to_string(),
            message,
        };

        let response = self
            .client
            .post(rpc_url.clone())
            .json(&payload)
            .send()
            .await
            .map_err(|err| connection_error(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(connection_error(format!("endpoint returned {status}")));
        }

        // a failure while reading the body is still a transport failure
        let bytes = response
            .bytes()
            .await
            .map_err(|err| connection_error(err.to_string()))?;

        let body: RpcResponse = serde_json::from_slice(&bytes)
            .map_err(|err| BalanceError::Query(format!("invalid response: {err}")))?;

        match body {
            RpcResponse {
                error: Some(RpcError { code, message }),
                ..
            } => Err(BalanceError::Query(format!("node error {code}: {message}"))),
            RpcResponse {
                result: Some(result),
                ..
            } => {
                let balance = decode_quantity(&result)?;
                debug!(%address, %balance, "got balance");
                Ok(balance)
            }
            RpcResponse { result: None, .. } => {
                Err(BalanceError::Query("response has no result".to_string()))
            }
        }
    }
}
