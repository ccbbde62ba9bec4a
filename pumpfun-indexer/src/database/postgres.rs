//! PostgreSQL gateway with runtime queries (no compile-time checking)

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{postgres::PgPoolOptions, PgPool, Postgres, QueryBuilder};
use tracing::info;

use super::{CreationRow, PoolRow, SwapRow};
use crate::config::DatabaseConfig;
use crate::core::error::StorageResult;
use crate::core::traits::PersistenceGateway;
use crate::models::{PoolState, SwapEvent, TokenCreationEvent};

#[derive(Clone)]
pub struct PostgresGateway {
    pub pool: PgPool,
}

impl PostgresGateway {
    pub async fn connect(config: &DatabaseConfig) -> StorageResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
            .connect(&config.postgres_url)
            .await?;

        info!(
            "Connected to PostgreSQL (max {} connections)",
            config.max_connections
        );
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn health_check(&self) -> StorageResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn get_pool_by_mint(&self, mint: &str) -> StorageResult<Option<PoolRow>> {
        let row = sqlx::query_as::<_, PoolRow>(
            r#"
            SELECT id, mint, bonding_curve, associated_bonding_curve,
                   virtual_sol_reserves, virtual_token_reserves,
                   created_at, signature, last_updated
            FROM pools
            WHERE mint = $1
            "#,
        )
        .bind(mint)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_swaps_by_signature(&self, signature: &str) -> StorageResult<Vec<SwapRow>> {
        let rows = sqlx::query_as::<_, SwapRow>(
            r#"
            SELECT id, account, mint, sol_amount, token_amount, is_buy, created_at, signature
            FROM swaps
            WHERE signature = $1
            ORDER BY id
            "#,
        )
        .bind(signature)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

#[async_trait]
impl PersistenceGateway for PostgresGateway {
    async fn insert_token_creation(&self, event: &TokenCreationEvent) -> StorageResult<()> {
        let row = CreationRow::from_event(event);
        let query = r#"
            INSERT INTO pump_fun_creations (
                name, symbol, uri, mint_address, bonding_curve, creator, signature, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#;

        sqlx::query(query)
            .bind(&row.name)
            .bind(&row.symbol)
            .bind(&row.uri)
            .bind(&row.mint_address)
            .bind(&row.bonding_curve)
            .bind(&row.creator)
            .bind(&row.signature)
            .bind(row.created_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn upsert_pool_state(&self, pool: &PoolState) -> StorageResult<()> {
        let row = PoolRow::from_state(pool);
        let query = r#"
            INSERT INTO pools (
                mint, bonding_curve, associated_bonding_curve,
                virtual_sol_reserves, virtual_token_reserves,
                created_at, signature, last_updated
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (mint) DO UPDATE SET
                bonding_curve = EXCLUDED.bonding_curve,
                associated_bonding_curve = EXCLUDED.associated_bonding_curve,
                virtual_sol_reserves = EXCLUDED.virtual_sol_reserves,
                virtual_token_reserves = EXCLUDED.virtual_token_reserves,
                signature = EXCLUDED.signature,
                last_updated = EXCLUDED.last_updated
        "#;

        sqlx::query(query)
            .bind(&row.mint)
            .bind(&row.bonding_curve)
            .bind(&row.associated_bonding_curve)
            .bind(row.virtual_sol_reserves)
            .bind(row.virtual_token_reserves)
            .bind(row.created_at)
            .bind(&row.signature)
            .bind(row.last_updated)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn insert_swap_batch(&self, swaps: &[SwapEvent]) -> StorageResult<()> {
        if swaps.is_empty() {
            return Ok(());
        }

        let now = Utc::now();
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO swaps (account, mint, sol_amount, token_amount, is_buy, created_at, signature) ",
        );
        builder.push_values(swaps.iter().map(|swap| SwapRow::from_event(swap, now)), |mut values, row| {
            values
                .push_bind(row.account)
                .push_bind(row.mint)
                .push_bind(row.sol_amount)
                .push_bind(row.token_amount)
                .push_bind(row.is_buy)
                .push_bind(row.created_at)
                .push_bind(row.signature);
        });

        builder.build().execute(&self.pool).await?;
        Ok(())
    }
}
