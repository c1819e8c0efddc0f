use tracing::info;

use super::{
    alerts::NotificationSink,
    chain::BalanceClient,
    processor::{WalletProcessor, WalletReport, WalletStatus},
    store::{StoreError, WalletStore},
};

/// Counts over one pass, for the log line at the end of it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PassSummary {
    pub pending: usize,
    pub derived: usize,
    pub derivation_failures: usize,
    pub address_store_failures: usize,
    pub chain_failures: usize,
    pub found: usize,
    pub balance_store_failures: usize,
    pub notify_failures: usize,
    pub empty: usize,
}

impl PassSummary {
    pub fn record(&mut self, report: &WalletReport) {
        if report.address_derived {
            self.derived += 1;
        }
        if report.address_store_error.is_some() {
            self.address_store_failures += 1;
        }
        self.chain_failures += report.chain_failures.len();

        match &report.status {
            WalletStatus::DerivationFailed(_) => self.derivation_failures += 1,
            WalletStatus::Empty => self.empty += 1,
            WalletStatus::Found(found) => {
                self.found += 1;
                if !found.balance_recorded {
                    self.balance_store_failures += 1;
                }
                if !found.notify_sent {
                    self.notify_failures += 1;
                }
            }
        }
    }
}

pub struct BatchRunner<S, C, N> {
    processor: WalletProcessor<S, C, N>,
}

impl<S, C, N> BatchRunner<S, C, N>
where
    S: WalletStore + Sync,
    C: BalanceClient + Sync,
    N: NotificationSink + Sync,
{
    pub fn new(processor: WalletProcessor<S, C, N>) -> Self {
        Self { processor }
    }

    /// Checks every wallet pending at the start of the pass, one after the other. Only
    /// failing to load the pending wallets fails the pass.
    pub async fn run_pass(&self) -> Result<PassSummary, StoreError> {
        let mut wallets = self.processor.store().find_pending().await?;

        info!(
            wallets = wallets.len(),
            chains = self.processor.chains().len(),
            "starting wallet balance check"
        );

        let mut summary = PassSummary {
            pending: wallets.len(),
            ..PassSummary::default()
        };

        for wallet in wallets.iter_mut() {
            let report = self.processor.process(wallet).await;
            summary.record(&report);
        }

        info!(?summary, "wallet balance check finished");

        Ok(summary)
    }
}
