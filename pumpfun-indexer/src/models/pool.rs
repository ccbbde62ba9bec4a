//! Pool state model, one row per mint

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

use super::SwapEvent;
use crate::processors::accounts::PoolAddresses;

/// Latest known bonding curve reserves for a mint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolState {
    pub mint: Pubkey,
    pub bonding_curve: Pubkey,
    pub associated_bonding_curve: Pubkey,
    pub virtual_sol_reserves: u64,
    pub virtual_token_reserves: u64,
    pub signature: String,
    pub last_updated: DateTime<Utc>,
}

impl PoolState {
    /// Build the pool snapshot carried by a swap
    pub fn from_swap(swap: &SwapEvent, addresses: PoolAddresses, observed_at: DateTime<Utc>) -> Self {
        Self {
            mint: swap.mint,
            bonding_curve: addresses.bonding_curve,
            associated_bonding_curve: addresses.associated_bonding_curve,
            virtual_sol_reserves: swap.virtual_sol_reserves,
            virtual_token_reserves: swap.virtual_token_reserves,
            signature: swap.signature.clone(),
            last_updated: observed_at,
        }
    }
}
