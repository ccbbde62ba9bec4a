//! Routes decoded events onto their bounded queues

use tokio::sync::mpsc;

use crate::core::error::{EventKind, PipelineError};
use crate::models::{PumpEvent, SwapEvent, TokenCreationEvent};

/// Producer handle onto the pipeline queues.
///
/// Sends wait while the target queue is full; that wait is the only
/// backpressure between scanning and persistence.
#[derive(Debug, Clone)]
pub struct EventDispatcher {
    creations: mpsc::Sender<TokenCreationEvent>,
    swaps: mpsc::Sender<SwapEvent>,
}

impl EventDispatcher {
    pub(crate) fn new(
        creations: mpsc::Sender<TokenCreationEvent>,
        swaps: mpsc::Sender<SwapEvent>,
    ) -> Self {
        Self { creations, swaps }
    }

    pub async fn dispatch(&self, event: PumpEvent) -> Result<(), PipelineError> {
        match event {
            PumpEvent::Swap(swap) => self.dispatch_swap(swap).await,
            PumpEvent::Creation(creation) => self.dispatch_creation(creation).await,
        }
    }

    pub async fn dispatch_swap(&self, swap: SwapEvent) -> Result<(), PipelineError> {
        self.swaps
            .send(swap)
            .await
            .map_err(|_| PipelineError::Closed(EventKind::Swap))
    }

    pub async fn dispatch_creation(&self, creation: TokenCreationEvent) -> Result<(), PipelineError> {
        self.creations
            .send(creation)
            .await
            .map_err(|_| PipelineError::Closed(EventKind::Creation))
    }

    pub fn swap_capacity(&self) -> usize {
        self.swaps.max_capacity()
    }

    pub fn creation_capacity(&self) -> usize {
        self.creations.max_capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::pubkey::Pubkey;
    use std::time::Duration;

    fn swap(n: u64) -> SwapEvent {
        SwapEvent {
            discriminator: [0; 16],
            mint: Pubkey::new_unique(),
            sol_amount: n,
            token_amount: n,
            is_buy_flag: (n % 2 == 0) as u8,
            user: Pubkey::new_unique(),
            timestamp: 0,
            virtual_sol_reserves: 0,
            virtual_token_reserves: 0,
            signature: format!("sig{}", n),
        }
    }

    #[tokio::test]
    async fn test_send_blocks_when_queue_full() {
        let (creation_tx, _creation_rx) = mpsc::channel(1);
        let (swap_tx, mut swap_rx) = mpsc::channel(1);
        let dispatcher = EventDispatcher::new(creation_tx, swap_tx);

        dispatcher.dispatch_swap(swap(1)).await.unwrap();

        let blocked = tokio::time::timeout(Duration::from_millis(50), dispatcher.dispatch_swap(swap(2))).await;
        assert!(blocked.is_err(), "second send should wait for capacity");

        assert_eq!(swap_rx.recv().await.unwrap().sol_amount, 1);
        dispatcher.dispatch_swap(swap(3)).await.unwrap();
        assert_eq!(swap_rx.recv().await.unwrap().sol_amount, 3);
    }

    #[tokio::test]
    async fn test_dispatch_to_closed_queue() {
        let (creation_tx, _creation_rx) = mpsc::channel(1);
        let (swap_tx, swap_rx) = mpsc::channel(1);
        drop(swap_rx);
        let dispatcher = EventDispatcher::new(creation_tx, swap_tx);

        let err = dispatcher.dispatch(PumpEvent::Swap(swap(1))).await.unwrap_err();
        assert_eq!(err, PipelineError::Closed(EventKind::Swap));
    }
}
