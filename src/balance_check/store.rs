mod postgres;

pub use postgres::PostgresWalletStore;

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Clone, PartialEq, sqlx::FromRow)]
pub struct WalletRecord {
    pub id: i64,
    pub mnemonic: String,
    /// Empty until derived.
    pub address: String,
    /// Decimal string of the last nonzero balance found.
    pub balance: Option<String>,
    pub balance_updated_at: Option<DateTime<Utc>>,
    pub is_notified: bool,
}

impl WalletRecord {
    pub fn new(id: i64, mnemonic: impl Into<String>) -> Self {
        Self {
            id,
            mnemonic: mnemonic.into(),
            address: String::new(),
            balance: None,
            balance_updated_at: None,
            is_notified: false,
        }
    }

    /// A notified record carries the address, balance and timestamp that triggered it.
    pub fn is_consistent(&self) -> bool {
        !self.is_notified
            || (!self.address.is_empty()
                && self.balance.as_ref().is_some_and(|b| !b.is_empty())
                && self.balance_updated_at.is_some())
    }
}

fn redact_mnemonic(mnemonic: &str) -> String {
    let mut words = mnemonic.split_whitespace();
    match words.next() {
        Some(first) => format!("{} ... ({} words)", first, words.count() + 1),
        None => "(empty)".to_string(),
    }
}

impl fmt::Debug for WalletRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletRecord")
            .field("id", &self.id)
            .field("mnemonic", &redact_mnemonic(&self.mnemonic))
            .field("address", &self.address)
            .field("balance", &self.balance)
            .field("balance_updated_at", &self.balance_updated_at)
            .field("is_notified", &self.is_notified)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("wallet {0} not found")]
    NotFound(i64),
}

#[async_trait]
pub trait WalletStore {
    /// Every record not yet notified, in whatever order the store yields them.
    async fn find_pending(&self) -> Result<Vec<WalletRecord>, StoreError>;
    async fn save(&self, record: &WalletRecord) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_MNEMONIC: &str = "test test test test test test test test test test test junk";

    #[test]
    fn debug_output_redacts_mnemonic() {
        let record = WalletRecord::new(7, TEST_MNEMONIC);
        let debug = format!("{:?}", record);

        assert!(debug.contains("test ... (12 words)"));
        assert!(!debug.contains("junk"));
    }

    #[test]
    fn redacts_empty_mnemonic() {
        assert_eq!(redact_mnemonic("  "), "(empty)");
    }

    #[test]
    fn pending_record_is_consistent() {
        assert!(WalletRecord::new(1, TEST_MNEMONIC).is_consistent());
    }

    #[test]
    fn notified_record_needs_balance_and_timestamp() {
        let mut record = WalletRecord::new(1, TEST_MNEMONIC);
        record.is_notified = true;
        record.address = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".to_string();
        assert!(!record.is_consistent());

        record.balance = Some("1".to_string());
        assert!(!record.is_consistent());

        record.balance_updated_at = Some(Utc::now());
        assert!(record.is_consistent());
    }
}
