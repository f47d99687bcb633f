//! Bulk transfer engine
//!
//! Distributes a batch of transfer items across a fixed-size pool of worker
//! threads, each with its own session, retrying failed items with backoff
//! and collecting the sources that could not be transferred.

pub mod backoff;
pub mod batch;
pub mod cancel;

pub use backoff::BackoffPolicy;
pub use batch::{TransferEngine, TransferItem, TransferKind, TransferOptions, TransferReport};
pub use cancel::CancelToken;
