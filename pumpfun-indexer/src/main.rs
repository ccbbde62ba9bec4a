//! Pump.fun Geyser Indexer
//!
//! Consumes pump.fun transactions from a Yellowstone Geyser stream and
//! stores token creations, swaps and pool reserves in PostgreSQL.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use pumpfun_indexer::config::IndexerConfig;
use pumpfun_indexer::core::PersistenceGateway;
use pumpfun_indexer::database::{MemoryGateway, PostgresGateway};
use pumpfun_indexer::geyser::{GeyserSource, StreamDriver};
use pumpfun_indexer::pipeline::{BatchIngestionWorker, EventPipeline};
use pumpfun_indexer::processors::SelfInvocationScanner;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// How long shutdown waits for the worker to drain the queues
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Parser)]
#[command(name = "pumpfun-indexer")]
#[command(about = "Pump.fun Geyser Indexer")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "indexer.toml")]
    config: String,

    /// Override log level
    #[arg(long)]
    log_level: Option<String>,

    /// Keep everything in memory instead of writing to PostgreSQL
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_found = std::path::Path::new(&cli.config).exists();
    let mut config = if config_found {
        IndexerConfig::from_file(&cli.config)?
    } else {
        IndexerConfig::default()
    };
    config.apply_env_overrides()?;

    // Override log level if provided
    if let Some(log_level) = cli.log_level {
        config.monitoring.log_level = log_level.to_lowercase();
    }

    // Initialize logging
    init_logging(&config)?;
    if !config_found {
        warn!("Config file not found, using defaults: {}", cli.config);
    }

    config.validate()?;
    let program_id = config.program.program_id()?;
    let event_authority = config.program.event_authority()?;

    info!("Starting Pump.fun Indexer");
    info!("Program ID: {}", program_id);
    info!("Geyser endpoint: {}", config.geyser.endpoint);

    let gateway: Arc<dyn PersistenceGateway> = if cli.dry_run {
        info!("Dry run mode - records are kept in memory only");
        Arc::new(MemoryGateway::new())
    } else {
        info!("Initializing database connection...");
        let postgres = PostgresGateway::connect(&config.database).await?;
        postgres.health_check().await?;
        Arc::new(postgres)
    };

    let mut pipeline = EventPipeline::open(&config.pipeline);
    let queues = pipeline
        .take_queues()
        .ok_or_else(|| anyhow::anyhow!("pipeline queues already taken"))?;
    let dispatcher = pipeline
        .dispatcher()
        .ok_or_else(|| anyhow::anyhow!("pipeline closed before start"))?;

    let worker = BatchIngestionWorker::new(gateway, program_id, &config.pipeline);
    let worker_handle = tokio::spawn(worker.run(queues));

    let driver = StreamDriver::new(
        SelfInvocationScanner::new(program_id, event_authority),
        dispatcher,
        config.pipeline.max_in_flight_scans,
    );
    let source = GeyserSource::connect(&config.geyser, &program_id).await?;

    info!("Indexer started successfully. Press Ctrl+C to shutdown.");
    let outcome = tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Received shutdown signal");
            Ok(())
        }
        result = driver.run(source) => result,
    };

    if let Err(e) = outcome {
        // Transport failures end the process without draining
        error!("Geyser stream failed: {}", e);
        return Err(e.into());
    }

    pipeline.close();
    drop(driver);
    match tokio::time::timeout(DRAIN_TIMEOUT, worker_handle).await {
        Ok(Ok(stats)) => info!("Worker drained: {:?}", stats),
        Ok(Err(e)) => error!("Worker task error: {}", e),
        Err(_) => warn!("Worker did not drain within {:?}", DRAIN_TIMEOUT),
    }

    info!("Shutting down Pump.fun Indexer");
    Ok(())
}

fn init_logging(config: &IndexerConfig) -> Result<()> {
    let log_level = config
        .monitoring
        .log_level
        .parse()
        .unwrap_or(tracing::Level::INFO);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("pumpfun_indexer={},yellowstone_grpc_client=info", log_level).into()
    });

    if config.monitoring.structured_logging {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()?;
    }

    Ok(())
}
