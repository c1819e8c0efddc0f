//! In-memory stand-ins for the store, the chains and the alert channel.

use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, Mutex},
};

use alloy::primitives::U256;
use async_trait::async_trait;
use reqwest::{StatusCode, Url};

use super::{
    alerts::{NotificationSink, SendError},
    chain::{BalanceClient, BalanceError, ChainConfig},
    store::{StoreError, WalletRecord, WalletStore},
};

pub const TEST_MNEMONIC: &str = "test test test test test test test test test test test junk";
pub const TEST_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

/// A chain whose rpc url path is its name, so fakes can tell chains apart.
pub fn chain(name: &str) -> ChainConfig {
    ChainConfig::new(name, Url::parse(&format!("http://chain.test/{}", name)).unwrap())
}

fn chain_name(rpc_url: &Url) -> String {
    rpc_url.path().trim_start_matches('/').to_string()
}

#[derive(Default)]
struct MemoryStoreState {
    records: BTreeMap<i64, WalletRecord>,
    fail_saves: bool,
    fail_queries: bool,
    save_count: usize,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryStoreState>>,
}

impl MemoryStore {
    pub fn with_records(records: Vec<WalletRecord>) -> Self {
        let store = Self::default();
        store.state.lock().unwrap().records = records.into_iter().map(|r| (r.id, r)).collect();
        store
    }

    pub fn get(&self, id: i64) -> Option<WalletRecord> {
        self.state.lock().unwrap().records.get(&id).cloned()
    }

    pub fn all(&self) -> Vec<WalletRecord> {
        self.state.lock().unwrap().records.values().cloned().collect()
    }

    pub fn fail_saves(&self) {
        self.state.lock().unwrap().fail_saves = true;
    }

    pub fn fail_queries(&self) {
        self.state.lock().unwrap().fail_queries = true;
    }

    pub fn save_count(&self) -> usize {
        self.state.lock().unwrap().save_count
    }
}

#[async_trait]
impl WalletStore for MemoryStore {
    async fn find_pending(&self) -> Result<Vec<WalletRecord>, StoreError> {
        let state = self.state.lock().unwrap();
        if state.fail_queries {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(state
            .records
            .values()
            .filter(|r| !r.is_notified)
            .cloned()
            .collect())
    }

    async fn save(&self, record: &WalletRecord) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        state.save_count += 1;
        if state.fail_saves {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }

        let stored = state
            .records
            .get_mut(&record.id)
            .ok_or(StoreError::NotFound(record.id))?;
        if stored.address.is_empty() {
            stored.address = record.address.clone();
        }
        stored.balance = record.balance.clone();
        stored.balance_updated_at = record.balance_updated_at;
        stored.is_notified = stored.is_notified || record.is_notified;
        Ok(())
    }
}

#[derive(Clone)]
enum FakeAnswer {
    Balance(U256),
    Unreachable,
    QueryError,
}

/// Answers per chain name, unknown chains report zero.
#[derive(Clone, Default)]
pub struct FakeBalances {
    answers: HashMap<String, FakeAnswer>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl FakeBalances {
    pub fn balance(mut self, chain: &str, balance: u64) -> Self {
        self.answers
            .insert(chain.to_string(), FakeAnswer::Balance(U256::from(balance)));
        self
    }

    pub fn unreachable(mut self, chain: &str) -> Self {
        self.answers.insert(chain.to_string(), FakeAnswer::Unreachable);
        self
    }

    pub fn query_error(mut self, chain: &str) -> Self {
        self.answers.insert(chain.to_string(), FakeAnswer::QueryError);
        self
    }

    /// Chain names queried so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BalanceClient for FakeBalances {
    async fn get_balance(&self, rpc_url: &Url, _address: &str) -> Result<U256, BalanceError> {
        let name = chain_name(rpc_url);
        self.calls.lock().unwrap().push(name.clone());

        match self.answers.get(&name) {
            Some(FakeAnswer::Balance(balance)) => Ok(*balance),
            Some(FakeAnswer::Unreachable) => Err(BalanceError::Connection {
                url: rpc_url.to_string(),
                message: "connection refused".to_string(),
            }),
            Some(FakeAnswer::QueryError) => {
                Err(BalanceError::Query("header not found".to_string()))
            }
            None => Ok(U256::ZERO),
        }
    }
}

#[derive(Clone, Default)]
pub struct RecordingSink {
    sent: Arc<Mutex<Vec<(String, String)>>>,
    failing: bool,
}

impl RecordingSink {
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Every (destination, text) pair handed to the sink, including failed ones.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn send(&self, destination: &str, text: &str) -> Result<(), SendError> {
        self.sent
            .lock()
            .unwrap()
            .push((destination.to_string(), text.to_string()));

        if self.failing {
            return Err(SendError::Rejected {
                status: StatusCode::BAD_REQUEST,
                body: "chat not found".to_string(),
            });
        }
        Ok(())
    }
}
