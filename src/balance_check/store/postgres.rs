use std::str::FromStr;

use async_trait::async_trait;
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    ConnectOptions, Pool, Postgres,
};

use super::{StoreError, WalletRecord, WalletStore};

pub struct PostgresWalletStore {
    pool: Pool<Postgres>,
}

impl PostgresWalletStore {
    pub async fn new(database_url: &str) -> Result<Self, StoreError> {
        let connect_opts = PgConnectOptions::from_str(database_url)?
            // statements carry mnemonics
            .disable_statement_logging()
            .to_owned();

        // records are processed one at a time
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect_with(connect_opts)
            .await?;

        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &Pool<Postgres> {
        &self.pool
    }
}

#[async_trait]
impl WalletStore for PostgresWalletStore {
    async fn find_pending(&self) -> Result<Vec<WalletRecord>, StoreError> {
        sqlx::query_as::<_, WalletRecord>(
            "
            SELECT id, mnemonic, address, balance, balance_updated_at, is_notified
            FROM wallet_balances
            WHERE is_notified = FALSE
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Into::into)
    }

    async fn save(&self, record: &WalletRecord) -> Result<(), StoreError> {
        // address is written once, is_notified never goes back to false
        let result = sqlx::query(
            "
            UPDATE wallet_balances
            SET
              address = CASE WHEN address = '' THEN $2 ELSE address END,
              balance = $3,
              balance_updated_at = $4,
              is_notified = is_notified OR $5,
              updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(record.id)
        .bind(&record.address)
        .bind(&record.balance)
        .bind(record.balance_updated_at)
        .bind(record.is_notified)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(record.id));
        }

        Ok(())
    }
}
