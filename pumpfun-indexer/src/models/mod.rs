//! Data models for decoded pump.fun events and persisted pool state

pub mod creation;
pub mod pool;
pub mod swap;

pub use creation::TokenCreationEvent;
pub use pool::PoolState;
pub use swap::SwapEvent;

use serde::{Deserialize, Serialize};

/// An event recovered from a self-invocation call site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PumpEvent {
    Swap(SwapEvent),
    Creation(TokenCreationEvent),
}

impl PumpEvent {
    pub fn signature(&self) -> &str {
        match self {
            PumpEvent::Swap(swap) => &swap.signature,
            PumpEvent::Creation(creation) => &creation.signature,
        }
    }
}
