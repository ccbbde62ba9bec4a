//! Program addresses and pool account derivation

use solana_sdk::{pubkey, pubkey::Pubkey};

/// Pump.fun bonding curve program
pub const PUMP_PROGRAM_ID: Pubkey = pubkey!("6EF8rrecthR5Dkzon8Nwu78hRvfCKubJ14M5uBEwF6P");

/// Event authority the program passes as the only account of its
/// self-invocation (event emission) instructions
pub const EVENT_AUTHORITY: Pubkey = pubkey!("Ce6TQqeHC9p8KetsN6JsjHK7UTZk7nasjjnr7XxXp9F1");

pub mod seeds {
    pub const BONDING_CURVE: &[u8] = b"bonding-curve";
}

/// Accounts holding a mint's bonding curve state and token reserve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolAddresses {
    pub bonding_curve: Pubkey,
    pub associated_bonding_curve: Pubkey,
}

/// Derive the bonding curve PDA and its associated token account.
///
/// Returns `None` only when no bump seed yields an off-curve address.
pub fn derive_pool_addresses(mint: &Pubkey, program_id: &Pubkey) -> Option<PoolAddresses> {
    let (bonding_curve, _bump) =
        Pubkey::try_find_program_address(&[seeds::BONDING_CURVE, mint.as_ref()], program_id)?;
    let associated_bonding_curve =
        spl_associated_token_account::get_associated_token_address(&bonding_curve, mint);

    Some(PoolAddresses {
        bonding_curve,
        associated_bonding_curve,
    })
}
