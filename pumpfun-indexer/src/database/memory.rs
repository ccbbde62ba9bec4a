//! In-memory persistence gateway.
//!
//! Mirrors the Postgres tables, including the pool upsert rules, without a
//! database. Used by `--dry-run` and in tests. All data is lost when the
//! process exits.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use super::{CreationRow, PoolRow, SwapRow};
use crate::core::error::StorageResult;
use crate::core::traits::PersistenceGateway;
use crate::models::{PoolState, SwapEvent, TokenCreationEvent};

#[derive(Default)]
struct Tables {
    next_id: i64,
    creations: Vec<CreationRow>,
    pools: HashMap<String, PoolRow>,
    swaps: Vec<SwapRow>,
    swap_batches: u64,
}

impl Tables {
    fn assign_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryGateway {
    tables: Mutex<Tables>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn creations(&self) -> Vec<CreationRow> {
        self.tables.lock().await.creations.clone()
    }

    pub async fn pool(&self, mint: &str) -> Option<PoolRow> {
        self.tables.lock().await.pools.get(mint).cloned()
    }

    pub async fn pool_count(&self) -> usize {
        self.tables.lock().await.pools.len()
    }

    pub async fn swaps(&self) -> Vec<SwapRow> {
        self.tables.lock().await.swaps.clone()
    }

    /// Number of non-empty batch inserts received
    pub async fn swap_batches(&self) -> u64 {
        self.tables.lock().await.swap_batches
    }
}

#[async_trait]
impl PersistenceGateway for MemoryGateway {
    async fn insert_token_creation(&self, event: &TokenCreationEvent) -> StorageResult<()> {
        let mut tables = self.tables.lock().await;
        let mut row = CreationRow::from_event(event);
        row.id = tables.assign_id();
        tables.creations.push(row);
        Ok(())
    }

    async fn upsert_pool_state(&self, pool: &PoolState) -> StorageResult<()> {
        let mut tables = self.tables.lock().await;
        let incoming = PoolRow::from_state(pool);

        if let Some(existing) = tables.pools.get_mut(&incoming.mint) {
            existing.overwrite_from(incoming);
            return Ok(());
        }

        let mut row = incoming;
        row.id = tables.assign_id();
        tables.pools.insert(row.mint.clone(), row);
        Ok(())
    }

    async fn insert_swap_batch(&self, swaps: &[SwapEvent]) -> StorageResult<()> {
        if swaps.is_empty() {
            return Ok(());
        }

        let now = Utc::now();
        let mut tables = self.tables.lock().await;
        for swap in swaps {
            let mut row = SwapRow::from_event(swap, now);
            row.id = tables.assign_id();
            tables.swaps.push(row);
        }
        tables.swap_batches += 1;
        Ok(())
    }
}
