//! Core domain abstractions and types
//!
//! Foundational types, ports and error definitions shared by the decoder,
//! the pipeline and the infrastructure adapters.

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items
pub use error::{
    DecodeError, EventKind, IndexerError, IndexerResult, NetworkError, PipelineError, StorageError,
    StorageResult,
};
pub use traits::{NotificationSource, PersistenceGateway};
pub use types::{Instruction, TransactionView};
