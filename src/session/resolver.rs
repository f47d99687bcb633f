//! Session resolver
//!
//! Turns caller intent into a live, authenticated session. Precedence:
//! explicit session > named-server lookup > explicit credentials >
//! default-named-server fallback. The returned guard records whether the
//! scope owns the session lifetime.

use log::debug;
use std::sync::Arc;

use crate::config::ClientConfig;
use crate::error::ResolveError;
use crate::session::{ConnectionDescriptor, Connector, ScopedSession, Session, Vault};

/// How a single operation wants its session supplied.
pub enum SessionSource<'a> {
    /// Use this session; the caller keeps ownership and closes it.
    Existing(&'a mut dyn Session),
    /// Open a session for the named server from configuration.
    Named(&'a str),
    /// Open a session with these explicit credentials.
    Login(&'a ConnectionDescriptor),
    /// Open a session for the configured default server.
    Default,
}

/// Owned variant of [`SessionSource`] for workers that must each open their
/// own connection. There is deliberately no existing-session arm: sessions
/// are never shared across workers.
#[derive(Debug, Clone)]
pub enum ConnectSpec {
    Named(String),
    Login(ConnectionDescriptor),
    Default,
}

/// Resolves sessions from configuration, a vault, and a connector.
pub struct SessionResolver {
    config: ClientConfig,
    connector: Arc<dyn Connector>,
    vault: Arc<dyn Vault>,
}

impl SessionResolver {
    pub fn new(
        config: ClientConfig,
        connector: Arc<dyn Connector>,
        vault: Arc<dyn Vault>,
    ) -> Self {
        Self {
            config,
            connector,
            vault,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Resolve a per-call session source into a scoped session.
    pub fn resolve<'a>(
        &self,
        source: SessionSource<'a>,
    ) -> Result<ScopedSession<'a>, ResolveError> {
        match source {
            SessionSource::Existing(session) => Ok(ScopedSession::borrowed(session)),
            SessionSource::Named(name) => self.open_named(name).map(ScopedSession::owned),
            SessionSource::Login(descriptor) => {
                self.connector.connect(descriptor).map(ScopedSession::owned)
            }
            SessionSource::Default => self
                .open_named(&self.config.default_server)
                .map(ScopedSession::owned),
        }
    }

    /// Open a fresh owned session for a worker.
    pub fn open(&self, spec: &ConnectSpec) -> Result<Box<dyn Session>, ResolveError> {
        match spec {
            ConnectSpec::Named(name) => self.open_named(name),
            ConnectSpec::Login(descriptor) => self.connector.connect(descriptor),
            ConnectSpec::Default => self.open_named(&self.config.default_server),
        }
    }

    fn open_named(&self, name: &str) -> Result<Box<dyn Session>, ResolveError> {
        let blob = self
            .config
            .servers
            .get(name)
            .ok_or_else(|| ResolveError::UnknownServer(name.to_string()))?;

        let json = self.vault.decrypt(blob)?;
        let descriptor = ConnectionDescriptor::from_blob(&json)?;

        debug!(
            "Resolved server '{}' to {}@{}",
            name, descriptor.user, descriptor.host
        );

        self.connector.connect(&descriptor)
    }
}
