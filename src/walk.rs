//! Remote tree walking
//!
//! Lazy depth-first enumeration of the files under a remote directory root,
//! optionally filtered by a regular expression. The walker borrows one
//! session for its whole lifetime; each invocation is single-pass.

use regex::Regex;

use crate::error::TransferError;
use crate::ops;
use crate::session::Session;

/// Lazy depth-first iterator over remote file paths.
///
/// Yields `Ok(path)` for every file under the root whose path matches the
/// pattern (or every file when no pattern was given). Directories are
/// descended into, never yielded. A listing failure mid-walk is yielded as
/// the final `Err` item.
pub struct TreeWalker<'a> {
    session: &'a mut dyn Session,
    pattern: Option<Regex>,
    stack: Vec<String>,
    pending_root: Option<String>,
    done: bool,
}

/// Starts a depth-first walk below `root`.
///
/// An invalid pattern fails up front with `Pattern`; the root itself is
/// examined lazily on the first `next()` call, so walking a plain file
/// yields just that file.
pub fn walk<'a>(
    session: &'a mut dyn Session,
    root: &str,
    pattern: Option<&str>,
) -> Result<TreeWalker<'a>, TransferError> {
    let pattern = match pattern {
        Some(p) => Some(Regex::new(p).map_err(|e| TransferError::Pattern(e.to_string()))?),
        None => None,
    };

    Ok(TreeWalker {
        session,
        pattern,
        stack: Vec::new(),
        pending_root: Some(root.to_string()),
        done: false,
    })
}

impl std::fmt::Debug for TreeWalker<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeWalker")
            .field("pattern", &self.pattern)
            .field("stack", &self.stack)
            .field("pending_root", &self.pending_root)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

impl TreeWalker<'_> {
    fn matches(&self, path: &str) -> bool {
        match &self.pattern {
            Some(re) => re.is_match(path),
            None => true,
        }
    }
}

impl Iterator for TreeWalker<'_> {
    type Item = Result<String, TransferError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        // The root listing is the one probe whose target may not exist;
        // everything on the stack afterwards came out of a listing.
        if let Some(root) = self.pending_root.take() {
            match self.session.list(&root) {
                Ok(mut entries) => {
                    entries.reverse();
                    self.stack.extend(entries);
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }

        while let Some(path) = self.stack.pop() {
            match ops::is_dir(self.session, &path) {
                Ok(true) => match self.session.list(&path) {
                    Ok(mut children) => {
                        // Reversed so popping preserves listing order
                        children.reverse();
                        self.stack.extend(children);
                    }
                    Err(e) => {
                        self.done = true;
                        return Some(Err(e));
                    }
                },
                Ok(false) => {
                    if self.matches(&path) {
                        return Some(Ok(path));
                    }
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }

        None
    }
}
