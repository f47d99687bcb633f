//! Remote directory probing and creation

use log::info;

use crate::error::TransferError;
use crate::session::Session;

/// Checks whether `path` is a directory on the remote side.
///
/// The protocol has no direct probe, so this attempts to change the
/// session's working directory into `path`: success means directory, a
/// refusal means "not a directory". The prior cursor is restored before
/// returning; only a failure to restore it propagates as an error.
pub fn is_dir(session: &mut dyn Session, path: &str) -> Result<bool, TransferError> {
    let current = session.current_dir()?;

    if session.change_dir(path).is_err() {
        // Cursor never moved, nothing to restore
        return Ok(false);
    }

    session.change_dir(&current)?;
    Ok(true)
}

/// Checks whether `path` exists on the remote side via a listing probe.
///
/// A non-empty listing means the path exists; an empty listing or a remote
/// refusal means it does not. The protocol reports missing paths as command
/// refusals, so the error case is folded into `false` here.
pub fn exists(session: &mut dyn Session, path: &str) -> bool {
    matches!(session.list(path), Ok(entries) if !entries.is_empty())
}

/// Creates `path` and every missing ancestor, root to leaf.
///
/// Idempotent: prefixes that already exist are skipped. A make-directory
/// refusal on a prefix that turns out to exist after re-probing is
/// tolerated; any other refusal propagates.
pub fn make_dirs(session: &mut dyn Session, path: &str) -> Result<(), TransferError> {
    let absolute = path.starts_with('/');
    let mut prefix = String::new();

    for segment in path.split('/').filter(|s| !s.is_empty()) {
        if prefix.is_empty() {
            if absolute {
                prefix.push('/');
            }
        } else {
            prefix.push('/');
        }
        prefix.push_str(segment);

        if is_dir(session, &prefix)? {
            continue;
        }

        info!("Create directory on FTP: {}", prefix);
        if let Err(e) = session.make_dir(&prefix) {
            if !is_dir(session, &prefix)? {
                return Err(e);
            }
        }
    }

    Ok(())
}
