//! Scoped session guard
//!
//! Pins down who terminates a session. An owned session is closed exactly
//! once when the guard leaves scope, on every exit path; a borrowed session
//! belongs to the caller and is never closed here.

use log::warn;

use crate::session::Session;

enum Inner<'a> {
    Owned(Option<Box<dyn Session>>),
    Borrowed(&'a mut dyn Session),
}

/// RAII guard around a resolved session.
pub struct ScopedSession<'a> {
    inner: Inner<'a>,
}

impl<'a> ScopedSession<'a> {
    /// Wrap a session this scope opened; drop will close it.
    pub fn owned(session: Box<dyn Session>) -> Self {
        Self {
            inner: Inner::Owned(Some(session)),
        }
    }

    /// Wrap a caller-supplied session; drop leaves it untouched.
    pub fn borrowed(session: &'a mut dyn Session) -> Self {
        Self {
            inner: Inner::Borrowed(session),
        }
    }

    /// Whether this scope owns the session lifetime.
    pub fn owns(&self) -> bool {
        matches!(self.inner, Inner::Owned(_))
    }

    /// Access the wrapped session.
    pub fn session(&mut self) -> &mut dyn Session {
        match &mut self.inner {
            Inner::Owned(Some(session)) => session.as_mut(),
            Inner::Owned(None) => unreachable!("session already released from guard"),
            Inner::Borrowed(session) => &mut **session,
        }
    }

    /// Release an owned session without closing it. Returns `None` when the
    /// session was borrowed.
    pub fn into_inner(mut self) -> Option<Box<dyn Session>> {
        match &mut self.inner {
            Inner::Owned(slot) => slot.take(),
            Inner::Borrowed(_) => None,
        }
    }
}

impl Drop for ScopedSession<'_> {
    fn drop(&mut self) {
        if let Inner::Owned(slot) = &mut self.inner {
            if let Some(mut session) = slot.take() {
                if let Err(e) = session.close() {
                    warn!("Failed to close session: {}", e);
                }
            }
        }
    }
}
