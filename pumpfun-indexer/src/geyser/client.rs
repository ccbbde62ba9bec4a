//! Yellowstone gRPC (Dragon's Mouth) notification source

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use solana_sdk::pubkey::Pubkey;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tonic::transport::ClientTlsConfig;
use tracing::{debug, info, warn};
use yellowstone_grpc_client::GeyserGrpcClient;
use yellowstone_grpc_proto::prelude::{
    subscribe_update::UpdateOneof, CommitmentLevel, SubscribeRequest,
    SubscribeRequestFilterTransactions, SubscribeRequestPing, SubscribeUpdate,
};

use super::convert::transaction_view_from_update;
use crate::config::GeyserConfig;
use crate::core::error::NetworkError;
use crate::core::traits::NotificationSource;
use crate::core::types::TransactionView;

/// Subscription filter name used in requests
const FILTER_NAME: &str = "pumpfun";

fn commitment_level(name: &str) -> CommitmentLevel {
    match name {
        "processed" => CommitmentLevel::Processed,
        "finalized" => CommitmentLevel::Finalized,
        _ => CommitmentLevel::Confirmed,
    }
}

/// Successful, non-vote transactions that mention `program_id`
pub fn build_subscribe_request(program_id: &Pubkey, commitment: &str) -> SubscribeRequest {
    let mut transactions = HashMap::new();
    transactions.insert(
        FILTER_NAME.to_string(),
        SubscribeRequestFilterTransactions {
            vote: Some(false),
            failed: Some(false),
            account_include: vec![program_id.to_string()],
            ..Default::default()
        },
    );

    SubscribeRequest {
        transactions,
        commitment: Some(commitment_level(commitment) as i32),
        ..Default::default()
    }
}

/// Transaction notifications streamed from a Geyser endpoint.
///
/// The gRPC client and its stream live on a background task that forwards
/// updates one at a time; dropping the source stops that task.
pub struct GeyserSource {
    updates: mpsc::Receiver<Result<SubscribeUpdate, NetworkError>>,
    task: JoinHandle<()>,
}

impl GeyserSource {
    pub async fn connect(config: &GeyserConfig, program_id: &Pubkey) -> Result<Self, NetworkError> {
        info!("Connecting to Geyser endpoint: {}", config.endpoint);

        let mut builder = GeyserGrpcClient::build_from_shared(config.endpoint.clone())
            .map_err(|e| NetworkError::InvalidEndpoint(e.to_string()))?
            .x_token(config.x_token.clone())
            .map_err(|e| NetworkError::InvalidEndpoint(e.to_string()))?
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .http2_keep_alive_interval(Duration::from_secs(config.keepalive_interval_secs))
            .keep_alive_timeout(Duration::from_secs(config.keepalive_timeout_secs));

        if config.endpoint.starts_with("https") {
            builder = builder
                .tls_config(ClientTlsConfig::new().with_native_roots())
                .map_err(|e| NetworkError::InvalidEndpoint(e.to_string()))?;
        }

        let mut client = builder
            .connect()
            .await
            .map_err(|e| NetworkError::ConnectionFailed(e.to_string()))?;

        let request = build_subscribe_request(program_id, &config.commitment);
        let (updates_tx, updates) = mpsc::channel(1);

        let task = tokio::spawn(async move {
            let (mut subscribe_tx, mut stream) = match client.subscribe_with_request(Some(request)).await {
                Ok(pair) => pair,
                Err(e) => {
                    let _ = updates_tx.send(Err(NetworkError::GeyserStream(e.to_string()))).await;
                    return;
                }
            };
            info!("Subscribed to transactions");

            while let Some(message) = stream.next().await {
                let update = match message {
                    Ok(update) => update,
                    Err(status) => {
                        let _ = updates_tx.send(Err(NetworkError::GeyserStream(status.to_string()))).await;
                        return;
                    }
                };

                if matches!(update.update_oneof, Some(UpdateOneof::Ping(_))) {
                    let pong = SubscribeRequest {
                        ping: Some(SubscribeRequestPing { id: 1 }),
                        ..Default::default()
                    };
                    if let Err(e) = subscribe_tx.send(pong).await {
                        warn!("Failed to answer server ping: {}", e);
                    }
                    continue;
                }

                if updates_tx.send(Ok(update)).await.is_err() {
                    debug!("Notification receiver dropped, stopping stream");
                    return;
                }
            }
        });

        Ok(Self { updates, task })
    }
}

impl Drop for GeyserSource {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[async_trait]
impl NotificationSource for GeyserSource {
    async fn next_notification(&mut self) -> Result<TransactionView, NetworkError> {
        loop {
            let update = match self.updates.recv().await {
                Some(Ok(update)) => update,
                Some(Err(e)) => return Err(e),
                None => return Err(NetworkError::StreamClosed),
            };

            let Some(UpdateOneof::Transaction(tx_update)) = update.update_oneof else {
                continue;
            };

            match transaction_view_from_update(tx_update) {
                Ok(Some(view)) => return Ok(view),
                Ok(None) => continue,
                Err(e) => warn!("Skipping transaction update: {}", e),
            }
        }
    }
}
