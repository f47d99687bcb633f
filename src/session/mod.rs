//! Session management
//!
//! The session is the capability everything else consumes: an authenticated,
//! stateful connection to the remote file store with a current-directory
//! cursor. This module defines the collaborator traits, the connection
//! descriptor, the resolver that turns caller intent into a live session,
//! and the scope guard that pins down session lifetime.

pub mod descriptor;
pub mod guard;
pub mod resolver;
pub mod traits;

pub use descriptor::ConnectionDescriptor;
pub use guard::ScopedSession;
pub use resolver::{ConnectSpec, SessionResolver, SessionSource};
pub use traits::{Connector, PlainVault, Session, Vault};
