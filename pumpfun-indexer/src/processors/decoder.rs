//! Binary decoding of pump.fun self-invocation event payloads
//!
//! Both layouts are Borsh: little-endian integers, a one-byte direction flag,
//! `u32` length-prefixed UTF-8 strings and raw 32-byte keys. Neither
//! discriminator is checked; the caller has already classified the
//! instruction that emitted the payload.

use borsh::{BorshDeserialize, BorshSerialize};
use chrono::Utc;
use solana_sdk::pubkey::Pubkey;

use crate::core::error::{DecodeError, EventKind};
use crate::models::{SwapEvent, TokenCreationEvent};

/// Leading discriminator on every event payload
pub const EVENT_DISCRIMINATOR_LEN: usize = 16;

/// discriminator + mint + sol + token + is_buy + user + timestamp + two reserves
pub const SWAP_EVENT_LEN: usize = EVENT_DISCRIMINATOR_LEN + 32 + 8 + 8 + 1 + 32 + 8 + 8 + 8;

#[derive(BorshSerialize, BorshDeserialize)]
struct SwapEventLayout {
    discriminator: [u8; 16],
    mint: [u8; 32],
    sol_amount: u64,
    token_amount: u64,
    is_buy_flag: u8,
    user: [u8; 32],
    timestamp: i64,
    virtual_sol_reserves: u64,
    virtual_token_reserves: u64,
}

#[derive(BorshSerialize, BorshDeserialize)]
struct CreateEventLayout {
    name: String,
    symbol: String,
    uri: String,
    mint: [u8; 32],
    bonding_curve: [u8; 32],
    creator: [u8; 32],
}

/// Decode a trade event. Bytes past the fixed layout are ignored.
pub fn decode_swap_event(data: &[u8]) -> Result<SwapEvent, DecodeError> {
    if data.len() < SWAP_EVENT_LEN {
        return Err(DecodeError::malformed(
            EventKind::Swap,
            format!("expected {} bytes, got {}", SWAP_EVENT_LEN, data.len()),
        ));
    }

    let mut buf = data;
    let layout = SwapEventLayout::deserialize(&mut buf)
        .map_err(|e| DecodeError::malformed(EventKind::Swap, e.to_string()))?;

    Ok(SwapEvent {
        discriminator: layout.discriminator,
        mint: Pubkey::new_from_array(layout.mint),
        sol_amount: layout.sol_amount,
        token_amount: layout.token_amount,
        is_buy_flag: layout.is_buy_flag,
        user: Pubkey::new_from_array(layout.user),
        timestamp: layout.timestamp,
        virtual_sol_reserves: layout.virtual_sol_reserves,
        virtual_token_reserves: layout.virtual_token_reserves,
        signature: String::new(),
    })
}

/// Decode a token creation event, stamping `created_at` with the current time.
pub fn decode_creation_event(data: &[u8]) -> Result<TokenCreationEvent, DecodeError> {
    let Some(mut buf) = data.get(EVENT_DISCRIMINATOR_LEN..) else {
        return Err(DecodeError::malformed(
            EventKind::Creation,
            format!(
                "expected at least {} discriminator bytes, got {}",
                EVENT_DISCRIMINATOR_LEN,
                data.len()
            ),
        ));
    };

    let layout = CreateEventLayout::deserialize(&mut buf)
        .map_err(|e| DecodeError::malformed(EventKind::Creation, e.to_string()))?;

    Ok(TokenCreationEvent {
        name: layout.name,
        symbol: layout.symbol,
        uri: layout.uri,
        mint: Pubkey::new_from_array(layout.mint),
        bonding_curve: Pubkey::new_from_array(layout.bonding_curve),
        creator: Pubkey::new_from_array(layout.creator),
        signature: String::new(),
        created_at: Utc::now(),
    })
}

/// Encode a trade event in its wire layout
pub fn encode_swap_event(event: &SwapEvent) -> Vec<u8> {
    let layout = SwapEventLayout {
        discriminator: event.discriminator,
        mint: event.mint.to_bytes(),
        sol_amount: event.sol_amount,
        token_amount: event.token_amount,
        is_buy_flag: event.is_buy_flag,
        user: event.user.to_bytes(),
        timestamp: event.timestamp,
        virtual_sol_reserves: event.virtual_sol_reserves,
        virtual_token_reserves: event.virtual_token_reserves,
    };
    let mut out = Vec::with_capacity(SWAP_EVENT_LEN);
    // Writing into a Vec cannot fail
    let _ = layout.serialize(&mut out);
    out
}

/// Encode a token creation event behind the given discriminator
pub fn encode_creation_event(discriminator: [u8; 16], event: &TokenCreationEvent) -> Vec<u8> {
    let layout = CreateEventLayout {
        name: event.name.clone(),
        symbol: event.symbol.clone(),
        uri: event.uri.clone(),
        mint: event.mint.to_bytes(),
        bonding_curve: event.bonding_curve.to_bytes(),
        creator: event.creator.to_bytes(),
    };
    let mut out = discriminator.to_vec();
    let _ = layout.serialize(&mut out);
    out
}
