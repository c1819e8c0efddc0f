pub mod alerts;
pub mod batch;
pub mod chain;
pub mod derive;
mod env;
pub mod processor;
pub mod store;
#[cfg(test)]
mod test_doubles;

use anyhow::{Context, Result};
use tracing::info;

use crate::env::get_app_config;

use self::{
    alerts::TelegramBot,
    batch::{BatchRunner, PassSummary},
    chain::JsonRpcBalanceClient,
    env::AppConfig,
    processor::WalletProcessor,
    store::PostgresWalletStore,
};

/// Runs a single pass over every wallet that has not been alerted on yet.
///
/// Meant to be started by an external scheduler. Individual wallet failures are logged and
/// counted in the returned summary, they do not fail the pass.
pub async fn check_wallet_balances() -> Result<PassSummary> {
    crate::log::init();

    let config: AppConfig = get_app_config();

    let store = PostgresWalletStore::new(&config.database_url)
        .await
        .context("failed to connect to database")?;
    sqlx::migrate!().run(store.pool()).await?;

    let bot = TelegramBot::new(
        config.telegram_api_url.clone(),
        config.telegram_app_bot_token.clone(),
        config.telegram_timeout(),
    )?;
    let username = bot
        .get_me()
        .await
        .context("failed to authorize telegram bot")?;
    info!(%username, "authorized telegram bot");

    let balances = JsonRpcBalanceClient::new(config.rpc_timeout())?;

    let processor = WalletProcessor::new(
        store,
        balances,
        bot,
        config.chains(),
        config.telegram_chat_id.clone(),
    );

    BatchRunner::new(processor)
        .run_pass()
        .await
        .context("failed to fetch wallets")
}
