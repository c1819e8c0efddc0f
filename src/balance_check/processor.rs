use alloy::primitives::U256;
use chrono::Utc;
use tracing::{debug, error, info, warn};

use super::{
    alerts::{self, NotificationSink, SendError},
    chain::{BalanceClient, BalanceError, ChainConfig},
    derive::{derive_address, DerivationError},
    store::{StoreError, WalletRecord, WalletStore},
};

#[derive(Debug)]
pub struct ChainFailure {
    pub chain: String,
    pub error: BalanceError,
}

/// A nonzero balance and what became of it. Recording it and alerting on it succeed or fail
/// independently of each other.
#[derive(Debug)]
pub struct BalanceFound {
    pub chain: String,
    pub balance: U256,
    pub balance_recorded: bool,
    pub store_error: Option<StoreError>,
    pub notify_sent: bool,
    pub notify_error: Option<SendError>,
}

#[derive(Debug)]
pub enum WalletStatus {
    /// No address could be derived, no chain was checked.
    DerivationFailed(DerivationError),
    /// Every chain answered zero or failed.
    Empty,
    Found(BalanceFound),
}

#[derive(Debug)]
pub struct WalletReport {
    pub wallet_id: i64,
    pub address_derived: bool,
    /// The address was derived but could not be stored, it will be derived again next pass.
    pub address_store_error: Option<StoreError>,
    pub chain_failures: Vec<ChainFailure>,
    pub status: WalletStatus,
}

impl WalletReport {
    fn new(wallet_id: i64) -> Self {
        Self {
            wallet_id,
            address_derived: false,
            address_store_error: None,
            chain_failures: Vec::new(),
            status: WalletStatus::Empty,
        }
    }
}

pub struct WalletProcessor<S, C, N> {
    store: S,
    balances: C,
    sink: N,
    chains: Vec<ChainConfig>,
    destination: String,
}

impl<S, C, N> WalletProcessor<S, C, N>
where
    S: WalletStore + Sync,
    C: BalanceClient + Sync,
    N: NotificationSink + Sync,
{
    pub fn new(
        store: S,
        balances: C,
        sink: N,
        chains: Vec<ChainConfig>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            store,
            balances,
            sink,
            chains,
            destination: destination.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn chains(&self) -> &[ChainConfig] {
        &self.chains
    }

    /// Derives the address when missing, then polls each chain in order until one reports a
    /// nonzero balance, which is stored and alerted on. Never fails, everything that went wrong
    /// is in the report.
    pub async fn process(&self, record: &mut WalletRecord) -> WalletReport {
        let mut report = WalletReport::new(record.id);

        if record.address.is_empty() {
            match derive_address(&record.mnemonic) {
                Ok(address) => {
                    record.address = address;
                    report.address_derived = true;
                    info!(wallet_id = record.id, address = %record.address, "derived address");

                    if let Err(err) = self.store.save(record).await {
                        error!(wallet_id = record.id, %err, "failed to save derived address");
                        report.address_store_error = Some(err);
                    }
                }
                Err(err) => {
                    error!(wallet_id = record.id, %err, "failed to derive address");
                    report.status = WalletStatus::DerivationFailed(err);
                    return report;
                }
            }
        }

        for chain in &self.chains {
            let balance = match self.balances.get_balance(&chain.rpc_url, &record.address).await {
                Ok(balance) => balance,
                Err(err) => {
                    warn!(
                        chain = %chain.name,
                        address = %record.address,
                        %err,
                        "failed to check balance"
                    );
                    report.chain_failures.push(ChainFailure {
                        chain: chain.name.clone(),
                        error: err,
                    });
                    continue;
                }
            };

            if balance.is_zero() {
                debug!(chain = %chain.name, address = %record.address, "zero balance");
                continue;
            }

            info!(
                chain = %chain.name,
                address = %record.address,
                %balance,
                "found balance"
            );
            report.status = WalletStatus::Found(self.record_and_alert(record, chain, balance).await);
            return report;
        }

        report
    }

    async fn record_and_alert(
        &self,
        record: &mut WalletRecord,
        chain: &ChainConfig,
        balance: U256,
    ) -> BalanceFound {
        record.balance = Some(balance.to_string());
        record.balance_updated_at = Some(Utc::now());
        record.is_notified = true;

        // the alert goes out whether or not the store accepted the write
        let store_error = match self.store.save(record).await {
            Ok(()) => None,
            Err(err) => {
                error!(wallet_id = record.id, %err, "failed to save found balance");
                Some(err)
            }
        };

        let message = alerts::balance_found_message(&chain.name, &record.address);
        let notify_error = match self.sink.send(&self.destination, &message).await {
            Ok(()) => {
                info!(address = %record.address, "sent balance notification");
                None
            }
            Err(err) => {
                error!(address = %record.address, %err, "failed to send balance notification");
                Some(err)
            }
        };

        BalanceFound {
            chain: chain.name.clone(),
            balance,
            balance_recorded: store_error.is_none(),
            store_error,
            notify_sent: notify_error.is_none(),
            notify_error,
        }
    }
}
