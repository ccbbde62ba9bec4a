//! Stream driver: sequential receive, bounded concurrent scanning

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

use crate::core::error::{IndexerError, IndexerResult};
use crate::core::traits::NotificationSource;
use crate::core::types::TransactionView;
use crate::pipeline::EventDispatcher;
use crate::processors::scanner::SelfInvocationScanner;

pub struct StreamDriver {
    scanner: Arc<SelfInvocationScanner>,
    dispatcher: EventDispatcher,
    permits: Arc<Semaphore>,
}

impl StreamDriver {
    pub fn new(scanner: SelfInvocationScanner, dispatcher: EventDispatcher, max_in_flight_scans: usize) -> Self {
        Self {
            scanner: Arc::new(scanner),
            dispatcher,
            permits: Arc::new(Semaphore::new(max_in_flight_scans.max(1))),
        }
    }

    /// Receive notifications one at a time and scan each on its own task.
    ///
    /// Once `max_in_flight_scans` tasks are running the driver stops
    /// receiving until one finishes. Only returns on a transport failure.
    pub async fn run<S: NotificationSource>(&self, mut source: S) -> IndexerResult<()> {
        info!(
            "Stream driver started (max {} in-flight scans)",
            self.permits.available_permits()
        );

        loop {
            let tx = source.next_notification().await?;

            let permit = self
                .permits
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| IndexerError::Other(e.into()))?;

            let scanner = self.scanner.clone();
            let dispatcher = self.dispatcher.clone();
            tokio::spawn(async move {
                let _permit = permit;
                process_transaction(&scanner, &dispatcher, tx).await;
            });
        }
    }
}

/// Scan one transaction and forward its events. Returns the number of
/// events handed to the pipeline.
pub async fn process_transaction(
    scanner: &SelfInvocationScanner,
    dispatcher: &EventDispatcher,
    tx: TransactionView,
) -> usize {
    let report = scanner.scan(&tx);

    for failure in &report.failures {
        error!("Dropping event in {}: {}", tx.signature, failure);
    }

    let mut dispatched = 0;
    for event in report.events {
        if let Err(e) = dispatcher.dispatch(event).await {
            warn!("Event from {} not delivered: {}", tx.signature, e);
            break;
        }
        dispatched += 1;
    }

    if dispatched > 0 {
        debug!("Dispatched {} events from {}", dispatched, tx.signature);
    }
    dispatched
}
