//! Error handling
//!
//! Defines error types for session resolution and transfer operations,
//! plus a general client error that encompasses both.

pub mod types;

pub use types::{ClientError, ResolveError, TransferError};
