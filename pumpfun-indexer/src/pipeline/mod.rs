//! Event pipeline: bounded queues between scan tasks and the ingestion worker
//!
//! [`EventPipeline`] owns both queues. Producers get cheap [`EventDispatcher`]
//! clones; the single consumer takes the [`EventQueues`] once and hands them
//! to a [`BatchIngestionWorker`]. Closing the pipeline and dropping every
//! dispatcher closes the queues, after which the worker drains what is left
//! and returns.

pub mod batch;
pub mod dispatcher;
pub mod worker;

pub use batch::SwapBatch;
pub use dispatcher::EventDispatcher;
pub use worker::{BatchIngestionWorker, WorkerStats};

use tokio::sync::mpsc;
use tracing::debug;

use crate::config::PipelineConfig;
use crate::models::{SwapEvent, TokenCreationEvent};

/// Consumer side of the pipeline
#[derive(Debug)]
pub struct EventQueues {
    pub creations: mpsc::Receiver<TokenCreationEvent>,
    pub swaps: mpsc::Receiver<SwapEvent>,
}

/// Owner of the creation and swap queues
#[derive(Debug)]
pub struct EventPipeline {
    dispatcher: Option<EventDispatcher>,
    queues: Option<EventQueues>,
}

impl EventPipeline {
    /// Create both queues with the configured capacities.
    ///
    /// Capacities of zero are raised to one since a rendezvous channel is
    /// not available.
    pub fn open(config: &PipelineConfig) -> Self {
        let creation_capacity = config.creation_queue_capacity.max(1);
        let swap_capacity = config.swap_queue_capacity.max(1);

        let (creation_tx, creation_rx) = mpsc::channel(creation_capacity);
        let (swap_tx, swap_rx) = mpsc::channel(swap_capacity);

        debug!(
            "Opened event pipeline (creation capacity {}, swap capacity {})",
            creation_capacity, swap_capacity
        );

        Self {
            dispatcher: Some(EventDispatcher::new(creation_tx, swap_tx)),
            queues: Some(EventQueues {
                creations: creation_rx,
                swaps: swap_rx,
            }),
        }
    }

    /// A producer handle, or `None` once the pipeline is closed
    pub fn dispatcher(&self) -> Option<EventDispatcher> {
        self.dispatcher.clone()
    }

    /// Hand out the consumer side. Only the first call returns `Some`.
    pub fn take_queues(&mut self) -> Option<EventQueues> {
        self.queues.take()
    }

    pub fn is_open(&self) -> bool {
        self.dispatcher.is_some()
    }

    /// Release the pipeline's own producer handle. The queues close once
    /// every outstanding dispatcher clone has been dropped too.
    pub fn close(&mut self) {
        if self.dispatcher.take().is_some() {
            debug!("Closed event pipeline");
        }
    }
}
