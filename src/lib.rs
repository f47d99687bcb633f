//! RAX FTP Client
//!
//! A client-side bulk file-transfer engine for FTP-like, session-oriented
//! remote file stores. Single-item operations, lazy tree walking, and a
//! concurrent batch engine with per-item retry and backoff, built over a
//! pluggable session transport.

pub mod client;
pub mod config;
pub mod engine;
pub mod error;
pub mod ops;
pub mod session;
pub mod walk;

pub use client::RaxFtpClient;
pub use config::ClientConfig;
pub use engine::{
    BackoffPolicy, CancelToken, TransferEngine, TransferItem, TransferKind, TransferOptions,
    TransferReport,
};
pub use error::{ClientError, ResolveError, TransferError};
pub use session::{
    ConnectSpec, ConnectionDescriptor, Connector, PlainVault, ScopedSession, Session,
    SessionResolver, SessionSource, Vault,
};
pub use walk::{TreeWalker, walk};
