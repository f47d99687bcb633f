//! Connection descriptor
//!
//! The immutable result of credential resolution: everything a connector
//! needs to open and authenticate one session.

use serde::Deserialize;
use std::collections::HashMap;

use crate::error::ResolveError;

/// Resolved connection parameters for one server.
///
/// Produced either from a vault-decrypted credential blob or supplied
/// directly by the caller. Encrypted transport is on unless the blob
/// states otherwise.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionDescriptor {
    pub host: String,
    pub user: String,
    pub secret: String,

    #[serde(default = "default_tls")]
    pub tls: bool,

    /// Extra connector-specific options (port, timeouts, ...)
    #[serde(default)]
    pub options: HashMap<String, String>,
}

fn default_tls() -> bool {
    true
}

impl ConnectionDescriptor {
    pub fn new(
        host: impl Into<String>,
        user: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            user: user.into(),
            secret: secret.into(),
            tls: true,
            options: HashMap::new(),
        }
    }

    pub fn with_tls(mut self, tls: bool) -> Self {
        self.tls = tls;
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Parse a decrypted credential blob.
    pub fn from_blob(json: &str) -> Result<Self, ResolveError> {
        serde_json::from_str(json).map_err(|e| ResolveError::Credentials(e.to_string()))
    }
}
