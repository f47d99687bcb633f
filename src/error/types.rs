//! Error types
//!
//! Defines domain-specific error types for each concern of the FTP client.

use std::fmt;
use std::io;

/// Session resolution errors
#[derive(Debug)]
pub enum ResolveError {
    /// A named server was requested but is absent from configuration.
    UnknownServer(String),
    /// A stored credential blob failed to decrypt or parse.
    Credentials(String),
    /// The connector handshake or login failed.
    Authentication(String),
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::UnknownServer(name) => {
                write!(f, "Server '{}' not found in configuration", name)
            }
            ResolveError::Credentials(msg) => write!(f, "Invalid credentials: {}", msg),
            ResolveError::Authentication(msg) => write!(f, "Authentication failed: {}", msg),
        }
    }
}

impl std::error::Error for ResolveError {}

/// Transfer and path operation errors
#[derive(Debug)]
pub enum TransferError {
    /// Destination exists and the overwrite policy forbids replacing it.
    AlreadyExists(String),
    /// The remote side rejected a command (permission, missing path).
    Remote { path: String, message: String },
    /// Filesystem failure on the local side.
    LocalIo(io::Error),
    /// The supplied file pattern did not compile.
    Pattern(String),
    /// The operation was aborted by a cancellation request.
    Cancelled,
}

impl TransferError {
    pub fn remote(path: impl Into<String>, message: impl Into<String>) -> Self {
        TransferError::Remote {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferError::AlreadyExists(path) => {
                write!(f, "Destination already exists: {}", path)
            }
            TransferError::Remote { path, message } => {
                write!(f, "Remote error on {}: {}", path, message)
            }
            TransferError::LocalIo(e) => write!(f, "Local I/O error: {}", e),
            TransferError::Pattern(msg) => write!(f, "Invalid pattern: {}", msg),
            TransferError::Cancelled => write!(f, "Transfer cancelled"),
        }
    }
}

impl std::error::Error for TransferError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransferError::LocalIo(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for TransferError {
    fn from(error: io::Error) -> Self {
        TransferError::LocalIo(error)
    }
}

/// General FTP client error that encompasses all error types
#[derive(Debug)]
pub enum ClientError {
    Resolve(ResolveError),
    Transfer(TransferError),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Resolve(e) => write!(f, "Session resolution error: {}", e),
            ClientError::Transfer(e) => write!(f, "Transfer error: {}", e),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Resolve(e) => Some(e),
            ClientError::Transfer(e) => Some(e),
        }
    }
}

impl From<ResolveError> for ClientError {
    fn from(error: ResolveError) -> Self {
        ClientError::Resolve(error)
    }
}

impl From<TransferError> for ClientError {
    fn from(error: TransferError) -> Self {
        ClientError::Transfer(error)
    }
}
