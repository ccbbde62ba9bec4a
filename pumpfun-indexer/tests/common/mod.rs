//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use pumpfun_indexer::core::error::{NetworkError, StorageError, StorageResult};
use pumpfun_indexer::core::traits::{NotificationSource, PersistenceGateway};
use pumpfun_indexer::core::types::{Instruction, TransactionView};
use pumpfun_indexer::models::{PoolState, SwapEvent, TokenCreationEvent};
use pumpfun_indexer::processors::accounts::{EVENT_AUTHORITY, PUMP_PROGRAM_ID};
use pumpfun_indexer::processors::decoder::{encode_creation_event, encode_swap_event};
use solana_sdk::pubkey::Pubkey;

/// One call received by [`RecordingGateway`]
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCall {
    InsertCreation { signature: String },
    UpsertPool { mint: Pubkey, virtual_sol_reserves: u64, signature: String },
    InsertBatch { signatures: Vec<String> },
}

/// Gateway that records every call and can be told to fail
#[derive(Default)]
pub struct RecordingGateway {
    calls: Mutex<Vec<GatewayCall>>,
    pub fail_creations: AtomicBool,
    pub fail_upserts: AtomicBool,
    pub fail_batches: AtomicBool,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn batches(&self) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                GatewayCall::InsertBatch { signatures } => Some(signatures),
                _ => None,
            })
            .collect()
    }

    pub fn upserts(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, GatewayCall::UpsertPool { .. }))
            .count()
    }

    pub fn creations(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, GatewayCall::InsertCreation { .. }))
            .count()
    }

    fn record(&self, call: GatewayCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn outcome(flag: &AtomicBool, operation: &'static str) -> StorageResult<()> {
        if flag.load(Ordering::SeqCst) {
            Err(StorageError::Rejected {
                operation,
                reason: "injected failure".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl PersistenceGateway for RecordingGateway {
    async fn insert_token_creation(&self, event: &TokenCreationEvent) -> StorageResult<()> {
        self.record(GatewayCall::InsertCreation {
            signature: event.signature.clone(),
        });
        Self::outcome(&self.fail_creations, "insert_token_creation")
    }

    async fn upsert_pool_state(&self, pool: &PoolState) -> StorageResult<()> {
        self.record(GatewayCall::UpsertPool {
            mint: pool.mint,
            virtual_sol_reserves: pool.virtual_sol_reserves,
            signature: pool.signature.clone(),
        });
        Self::outcome(&self.fail_upserts, "upsert_pool_state")
    }

    async fn insert_swap_batch(&self, swaps: &[SwapEvent]) -> StorageResult<()> {
        self.record(GatewayCall::InsertBatch {
            signatures: swaps.iter().map(|s| s.signature.clone()).collect(),
        });
        Self::outcome(&self.fail_batches, "insert_swap_batch")
    }
}

/// Yields the queued notifications, then reports the stream as closed
pub struct VecSource {
    items: VecDeque<TransactionView>,
}

impl VecSource {
    pub fn new(items: Vec<TransactionView>) -> Self {
        Self { items: items.into() }
    }
}

#[async_trait]
impl NotificationSource for VecSource {
    async fn next_notification(&mut self) -> Result<TransactionView, NetworkError> {
        self.items.pop_front().ok_or(NetworkError::StreamClosed)
    }
}

pub fn sample_swap(n: u64) -> SwapEvent {
    SwapEvent {
        discriminator: [0xbd, 0xdb, 0x7f, 0xd3, 0x4e, 0xe6, 0x61, 0xee, 0xe4, 0x45, 0xa5, 0x2e, 0x51, 0xcb, 0x9a, 0x1d],
        mint: Pubkey::new_unique(),
        sol_amount: 1_000_000 * (n + 1),
        token_amount: 35_000_000 * (n + 1),
        is_buy_flag: (n % 2 == 0) as u8,
        user: Pubkey::new_unique(),
        timestamp: 1_718_000_000 + n as i64,
        virtual_sol_reserves: 30_000_000_000 + n,
        virtual_token_reserves: 1_073_000_000_000_000 - n,
        signature: format!("swap-sig-{}", n),
    }
}

pub fn sample_creation(n: u64) -> TokenCreationEvent {
    TokenCreationEvent {
        name: format!("Token {}", n),
        symbol: format!("TK{}", n),
        uri: format!("https://ipfs.io/ipfs/token-{}", n),
        mint: Pubkey::new_unique(),
        bonding_curve: Pubkey::new_unique(),
        creator: Pubkey::new_unique(),
        signature: format!("create-sig-{}", n),
        created_at: chrono::Utc::now(),
    }
}

fn unique_accounts(n: usize) -> Vec<Pubkey> {
    (0..n).map(|_| Pubkey::new_unique()).collect()
}

/// Self-invocation carrying an event payload
pub fn emit_instruction(payload: Vec<u8>) -> Instruction {
    Instruction::new(PUMP_PROGRAM_ID, vec![EVENT_AUTHORITY], payload)
}

/// A pump.fun `buy`/`sell` whose only inner instruction emits `swap`
pub fn swap_instruction(swap: &SwapEvent) -> Instruction {
    Instruction::new(PUMP_PROGRAM_ID, unique_accounts(12), vec![0x66; 24])
        .with_inner(vec![emit_instruction(encode_swap_event(swap))])
}

/// A pump.fun `create` whose only inner instruction emits `creation`
pub fn creation_instruction(creation: &TokenCreationEvent) -> Instruction {
    Instruction::new(PUMP_PROGRAM_ID, unique_accounts(14), vec![0x18; 24])
        .with_inner(vec![emit_instruction(encode_creation_event([0u8; 16], creation))])
}

pub fn swap_notification(n: u64) -> TransactionView {
    let swap = sample_swap(n);
    TransactionView::new(swap.signature.clone(), 1_000 + n, vec![swap_instruction(&swap)])
}
