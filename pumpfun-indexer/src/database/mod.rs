//! Persistence layer: row models and gateway implementations

pub mod memory;
pub mod postgres;

pub use memory::MemoryGateway;
pub use postgres::PostgresGateway;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{PoolState, SwapEvent, TokenCreationEvent};

/// Row of the `swaps` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SwapRow {
    pub id: i64,
    /// Trader wallet
    pub account: String,
    pub mint: String,
    pub sol_amount: Decimal,
    pub token_amount: Decimal,
    pub is_buy: bool,
    pub created_at: DateTime<Utc>,
    pub signature: String,
}

impl SwapRow {
    /// `id` is left at zero for the store to assign
    pub fn from_event(swap: &SwapEvent, created_at: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            account: swap.user.to_string(),
            mint: swap.mint.to_string(),
            sol_amount: Decimal::from(swap.sol_amount),
            token_amount: Decimal::from(swap.token_amount),
            is_buy: swap.is_buy(),
            created_at,
            signature: swap.signature.clone(),
        }
    }
}

/// Row of the `pools` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PoolRow {
    pub id: i64,
    pub mint: String,
    pub bonding_curve: String,
    pub associated_bonding_curve: String,
    pub virtual_sol_reserves: Decimal,
    pub virtual_token_reserves: Decimal,
    pub created_at: DateTime<Utc>,
    pub signature: String,
    pub last_updated: DateTime<Utc>,
}

impl PoolRow {
    pub fn from_state(pool: &PoolState) -> Self {
        Self {
            id: 0,
            mint: pool.mint.to_string(),
            bonding_curve: pool.bonding_curve.to_string(),
            associated_bonding_curve: pool.associated_bonding_curve.to_string(),
            virtual_sol_reserves: Decimal::from(pool.virtual_sol_reserves),
            virtual_token_reserves: Decimal::from(pool.virtual_token_reserves),
            created_at: pool.last_updated,
            signature: pool.signature.clone(),
            last_updated: pool.last_updated,
        }
    }

    /// Apply the columns an upsert is allowed to overwrite
    pub fn overwrite_from(&mut self, newer: PoolRow) {
        self.bonding_curve = newer.bonding_curve;
        self.associated_bonding_curve = newer.associated_bonding_curve;
        self.virtual_sol_reserves = newer.virtual_sol_reserves;
        self.virtual_token_reserves = newer.virtual_token_reserves;
        self.signature = newer.signature;
        self.last_updated = newer.last_updated;
    }
}

/// Row of the `pump_fun_creations` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CreationRow {
    pub id: i64,
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub mint_address: String,
    pub bonding_curve: String,
    pub creator: String,
    pub signature: String,
    pub created_at: DateTime<Utc>,
}

impl CreationRow {
    pub fn from_event(creation: &TokenCreationEvent) -> Self {
        Self {
            id: 0,
            name: creation.name.clone(),
            symbol: creation.symbol.clone(),
            uri: creation.uri.clone(),
            mint_address: creation.mint.to_string(),
            bonding_curve: creation.bonding_curve.to_string(),
            creator: creation.creator.to_string(),
            signature: creation.signature.clone(),
            created_at: creation.created_at,
        }
    }
}
