//! Geyser integration: Yellowstone transaction stream and the stream driver

pub mod client;
pub mod convert;
pub mod driver;

pub use client::{build_subscribe_request, GeyserSource};
pub use convert::transaction_view_from_update;
pub use driver::{process_transaction, StreamDriver};
