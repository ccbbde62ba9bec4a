//! Pump.fun Indexer Library
//!
//! Streams pump.fun transactions from a Yellowstone Geyser endpoint,
//! extracts the trade and token creation events the program emits through
//! self-invocation, and writes them to PostgreSQL through a bounded,
//! batching pipeline.

pub mod config;
pub mod core;
pub mod database;
pub mod geyser;
pub mod models;
pub mod pipeline;
pub mod processors;

// Re-export commonly used types
pub use config::IndexerConfig;
pub use models::{PoolState, PumpEvent, SwapEvent, TokenCreationEvent};
