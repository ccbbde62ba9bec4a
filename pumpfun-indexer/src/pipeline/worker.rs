//! Batch ingestion worker
//!
//! The only consumer of the pipeline queues and the only caller of the
//! persistence gateway. Creations are inserted one by one, every swap
//! refreshes its pool row and joins a batch that is bulk inserted once it
//! reaches the configured size (or, if enabled, when the flush timer fires).
//! Failed writes are logged and the affected records dropped.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use solana_sdk::pubkey::Pubkey;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use super::batch::SwapBatch;
use super::EventQueues;
use crate::config::PipelineConfig;
use crate::core::error::IndexerError;
use crate::core::traits::PersistenceGateway;
use crate::models::{PoolState, SwapEvent, TokenCreationEvent};
use crate::processors::accounts::derive_pool_addresses;

/// Counters reported when the worker stops
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerStats {
    pub creations_inserted: u64,
    pub creations_failed: u64,
    pub pools_upserted: u64,
    pub pools_failed: u64,
    pub pools_skipped: u64,
    pub batches_flushed: u64,
    pub batches_failed: u64,
    pub swaps_persisted: u64,
    pub swaps_dropped: u64,
}

pub struct BatchIngestionWorker {
    gateway: Arc<dyn PersistenceGateway>,
    program_id: Pubkey,
    batch: SwapBatch,
    flush_interval: Option<Duration>,
    stats: WorkerStats,
}

impl BatchIngestionWorker {
    pub fn new(gateway: Arc<dyn PersistenceGateway>, program_id: Pubkey, config: &PipelineConfig) -> Self {
        let flush_interval = match config.flush_interval_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        Self {
            gateway,
            program_id,
            batch: SwapBatch::new(config.swap_batch_size),
            flush_interval,
            stats: WorkerStats::default(),
        }
    }

    /// Consume both queues until they are closed and drained.
    ///
    /// A partial batch left at that point is not written.
    pub async fn run(mut self, queues: EventQueues) -> WorkerStats {
        let EventQueues {
            mut creations,
            mut swaps,
        } = queues;
        let mut creations_open = true;
        let mut swaps_open = true;
        let mut ticker = self.flush_interval.map(|period| {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });

        info!(
            "Batch ingestion worker started (batch size {}, flush interval {:?})",
            self.batch.threshold(),
            self.flush_interval
        );

        loop {
            tokio::select! {
                maybe_creation = creations.recv(), if creations_open => match maybe_creation {
                    Some(creation) => self.handle_creation(creation).await,
                    None => {
                        debug!("Creation queue closed");
                        creations_open = false;
                    }
                },
                maybe_swap = swaps.recv(), if swaps_open => match maybe_swap {
                    Some(swap) => self.handle_swap(swap).await,
                    None => {
                        debug!("Swap queue closed");
                        swaps_open = false;
                    }
                },
                _ = next_tick(&mut ticker), if ticker.is_some() && (creations_open || swaps_open) => {
                    self.flush_pending().await;
                }
                else => break,
            }
        }

        if !self.batch.is_empty() {
            warn!(
                "Worker stopping with {} swaps below the batch threshold, not written",
                self.batch.len()
            );
        }
        info!("Batch ingestion worker stopped: {:?}", self.stats);
        self.stats
    }

    pub async fn handle_creation(&mut self, creation: TokenCreationEvent) {
        debug!("New token {} ({}) in {}", creation.mint, creation.symbol, creation.signature);

        match self.gateway.insert_token_creation(&creation).await {
            Ok(()) => self.stats.creations_inserted += 1,
            Err(e) => {
                error!("Failed to insert token creation {}: {}", creation.signature, e);
                self.stats.creations_failed += 1;
            }
        }
    }

    pub async fn handle_swap(&mut self, swap: SwapEvent) {
        debug!("Swap on {} in {}", swap.mint, swap.signature);

        match derive_pool_addresses(&swap.mint, &self.program_id) {
            Some(addresses) => {
                let pool = PoolState::from_swap(&swap, addresses, Utc::now());
                match self.gateway.upsert_pool_state(&pool).await {
                    Ok(()) => self.stats.pools_upserted += 1,
                    Err(e) => {
                        error!("Failed to upsert pool {}: {}", pool.mint, e);
                        self.stats.pools_failed += 1;
                    }
                }
            }
            None => {
                let err = IndexerError::AddressDerivation {
                    mint: swap.mint.to_string(),
                };
                error!("Skipping pool update for {}: {}", swap.signature, err);
                self.stats.pools_skipped += 1;
            }
        }

        if let Some(full) = self.batch.push(swap) {
            self.persist_batch(full).await;
        }
    }

    /// Write out a partial batch, if any
    pub async fn flush_pending(&mut self) {
        let pending = self.batch.take();
        if !pending.is_empty() {
            self.persist_batch(pending).await;
        }
    }

    async fn persist_batch(&mut self, swaps: Vec<SwapEvent>) {
        let count = swaps.len() as u64;
        match self.gateway.insert_swap_batch(&swaps).await {
            Ok(()) => {
                debug!("Inserted batch of {} swaps", count);
                self.stats.batches_flushed += 1;
                self.stats.swaps_persisted += count;
            }
            Err(e) => {
                error!("Failed to insert batch of {} swaps, dropping it: {}", count, e);
                self.stats.batches_failed += 1;
                self.stats.swaps_dropped += count;
            }
        }
    }

    pub fn pending_swaps(&self) -> usize {
        self.batch.len()
    }

    pub fn stats(&self) -> &WorkerStats {
        &self.stats
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}
