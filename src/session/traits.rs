//! Collaborator traits consumed by the client
//!
//! The transport itself is out of scope: `Session` is the narrow surface the
//! engine drives, `Connector` opens and authenticates one, and `Vault`
//! decrypts stored credential blobs. Implementations live with the
//! surrounding tooling.

use std::io::{Read, Write};

use crate::error::{ResolveError, TransferError};
use crate::session::ConnectionDescriptor;

/// One authenticated connection to the remote file store.
///
/// A session carries protocol-level state: a current-working-directory
/// cursor moved by [`change_dir`](Session::change_dir) and a transfer-mode
/// flag set by [`set_binary`](Session::set_binary). It must never be shared
/// between concurrent operations; every method takes `&mut self`.
pub trait Session: Send {
    /// Current working directory of the control connection.
    fn current_dir(&mut self) -> Result<String, TransferError>;

    /// Change the working directory. A refusal is a `Remote` error.
    fn change_dir(&mut self, path: &str) -> Result<(), TransferError>;

    /// List child paths of `path`. Listing a file yields the file itself.
    fn list(&mut self, path: &str) -> Result<Vec<String>, TransferError>;

    /// Create a single directory.
    fn make_dir(&mut self, path: &str) -> Result<(), TransferError>;

    /// Switch the data connection to binary transfer mode.
    fn set_binary(&mut self) -> Result<(), TransferError>;

    /// Stream the remote file at `path` into `sink`; returns bytes moved.
    fn retrieve(&mut self, path: &str, sink: &mut dyn Write) -> Result<u64, TransferError>;

    /// Stream `source` into the remote file at `path`; returns bytes moved.
    fn store(&mut self, path: &str, source: &mut dyn Read) -> Result<u64, TransferError>;

    /// Terminate the session. Called at most once, by whoever opened it.
    fn close(&mut self) -> Result<(), TransferError>;
}

/// Opens and authenticates sessions from a connection descriptor.
pub trait Connector: Send + Sync {
    fn connect(&self, descriptor: &ConnectionDescriptor)
    -> Result<Box<dyn Session>, ResolveError>;
}

/// Decrypts a stored credential blob into connection-descriptor JSON.
pub trait Vault: Send + Sync {
    fn decrypt(&self, blob: &str) -> Result<String, ResolveError>;
}

/// Pass-through vault for configurations storing plaintext descriptor JSON.
pub struct PlainVault;

impl Vault for PlainVault {
    fn decrypt(&self, blob: &str) -> Result<String, ResolveError> {
        Ok(blob.to_string())
    }
}
