//! Swap (trade) event model

use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

/// Trade event emitted by the bonding curve program on every buy or sell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapEvent {
    /// Event discriminator as found on the wire, never checked
    pub discriminator: [u8; 16],
    pub mint: Pubkey,
    pub sol_amount: u64,
    pub token_amount: u64,
    /// Trade direction byte as found on the wire; any non-zero value is a buy
    pub is_buy_flag: u8,
    pub user: Pubkey,
    /// Unix timestamp reported by the program
    pub timestamp: i64,
    pub virtual_sol_reserves: u64,
    pub virtual_token_reserves: u64,

    /// Owning transaction signature, attached after decoding
    pub signature: String,
}

impl SwapEvent {
    pub fn is_buy(&self) -> bool {
        self.is_buy_flag != 0
    }

    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = signature.into();
        self
    }
}
