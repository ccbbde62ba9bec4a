//! Transaction processors: call tree scanning and event decoding

pub mod accounts;
pub mod decoder;
pub mod scanner;

pub use accounts::{derive_pool_addresses, PoolAddresses, EVENT_AUTHORITY, PUMP_PROGRAM_ID};
pub use decoder::{decode_creation_event, decode_swap_event};
pub use scanner::{ScanReport, SelfInvocationScanner};
