//! Token creation event model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

/// Emitted once when a new token and its bonding curve are created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCreationEvent {
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub mint: Pubkey,
    pub bonding_curve: Pubkey,
    pub creator: Pubkey,

    pub signature: String,
    /// Set when the payload is decoded, not taken from chain
    pub created_at: DateTime<Utc>,
}

impl TokenCreationEvent {
    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = signature.into();
        self
    }
}
