//! Core trait abstractions (ports)

use async_trait::async_trait;

use super::error::{NetworkError, StorageResult};
use super::types::TransactionView;
use crate::models::{PoolState, SwapEvent, TokenCreationEvent};

/// Persistence port consumed by the batch ingestion worker
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Insert one token creation record
    async fn insert_token_creation(&self, event: &TokenCreationEvent) -> StorageResult<()>;

    /// Insert or update the pool row keyed by `pool.mint`.
    ///
    /// On conflict only the derived addresses, reserves, signature and
    /// `last_updated` are overwritten; row identity and `created_at` stay.
    async fn upsert_pool_state(&self, pool: &PoolState) -> StorageResult<()>;

    /// Insert swaps in one statement. Empty input is a no-op.
    async fn insert_swap_batch(&self, swaps: &[SwapEvent]) -> StorageResult<()>;
}

/// Sequential source of transaction notifications.
///
/// Any error is a transport failure and is fatal to the caller.
#[async_trait]
pub trait NotificationSource: Send {
    async fn next_notification(&mut self) -> Result<TransactionView, NetworkError>;
}
