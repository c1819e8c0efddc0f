use anyhow::Result;

#[tokio::main]
pub async fn main() -> Result<()> {
    wallet_balance_checker::check_wallet_balances().await?;
    Ok(())
}
