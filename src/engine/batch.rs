//! Batch orchestration
//!
//! The work queue, worker pool, and per-item retry loop. Every submitted
//! item is accounted for in the report: transferred, failed after the full
//! retry budget, or cancelled.

use crossbeam_channel::{Receiver, unbounded};
use log::{error, info, warn};
use parking_lot::Mutex;
use std::thread;

use crate::config::ClientConfig;
use crate::engine::{BackoffPolicy, CancelToken};
use crate::error::TransferError;
use crate::ops;
use crate::session::{ConnectSpec, ScopedSession, Session, SessionResolver};

/// Direction of a bulk transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferKind {
    Upload,
    Download,
}

/// Per-item policy knobs shared by single and bulk operations.
#[derive(Debug, Clone, Copy)]
pub struct TransferOptions {
    /// Replace an existing destination instead of failing.
    pub overwrite: bool,
    /// Create missing destination directories.
    pub create_dirs: bool,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            overwrite: false,
            create_dirs: true,
        }
    }
}

/// One source/destination pair plus its policy. Identity is the source
/// path, which is what failure reporting carries.
#[derive(Debug, Clone)]
pub struct TransferItem {
    pub src: String,
    pub dst: String,
    pub overwrite: bool,
    pub create_dirs: bool,
}

impl TransferItem {
    pub fn new(src: impl Into<String>, dst: impl Into<String>, options: TransferOptions) -> Self {
        Self {
            src: src.into(),
            dst: dst.into(),
            overwrite: options.overwrite,
            create_dirs: options.create_dirs,
        }
    }
}

/// Outcome of a batch run. An item absent from both sets was transferred
/// fully.
#[derive(Debug, Default)]
pub struct TransferReport {
    /// Source paths that exhausted their retry budget.
    pub failed: Vec<String>,
    /// Source paths abandoned because the batch was cancelled.
    pub cancelled: Vec<String>,
}

impl TransferReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.cancelled.is_empty()
    }
}

/// Fixed-size worker pool driving a batch of transfer items.
pub struct TransferEngine {
    connections: usize,
    retries: usize,
    backoff: BackoffPolicy,
}

impl TransferEngine {
    pub fn new(connections: usize, retries: usize, backoff: BackoffPolicy) -> Self {
        Self {
            connections: connections.max(1),
            retries: retries.max(1),
            backoff,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.connections, config.retries, config.backoff())
    }

    /// Run a batch to completion with a private cancellation token.
    pub fn run(
        &self,
        resolver: &SessionResolver,
        spec: &ConnectSpec,
        items: Vec<TransferItem>,
        kind: TransferKind,
    ) -> TransferReport {
        self.run_with_cancel(resolver, spec, items, kind, &CancelToken::new())
    }

    /// Run a batch to completion, honoring an external cancellation token.
    ///
    /// Workers race to drain a shared queue; each opens its own session and
    /// holds it for the whole run. A worker that cannot open a session exits
    /// without consuming items; whatever nobody consumed is reported failed
    /// so the batch never drops items silently.
    pub fn run_with_cancel(
        &self,
        resolver: &SessionResolver,
        spec: &ConnectSpec,
        items: Vec<TransferItem>,
        kind: TransferKind,
        cancel: &CancelToken,
    ) -> TransferReport {
        let total = items.len();
        if total == 0 {
            return TransferReport::default();
        }

        let (tx, rx) = unbounded::<TransferItem>();
        for item in items {
            // Receiver outlives the loop, the send cannot fail
            let _ = tx.send(item);
        }
        drop(tx);

        let failed = Mutex::new(Vec::new());
        let cancelled = Mutex::new(Vec::new());
        let workers = self.connections.min(total);

        info!(
            "Starting {:?} batch: {} items across {} workers",
            kind, total, workers
        );

        thread::scope(|scope| {
            for worker_id in 0..workers {
                let rx = rx.clone();
                let failed = &failed;
                let cancelled = &cancelled;

                scope.spawn(move || {
                    self.run_worker(worker_id, resolver, spec, kind, rx, cancel, failed, cancelled)
                });
            }
        });

        let mut report = TransferReport {
            failed: failed.into_inner(),
            cancelled: cancelled.into_inner(),
        };

        // Items no worker consumed (every session failed to open)
        while let Ok(item) = rx.try_recv() {
            warn!("No worker session available for {}", item.src);
            report.failed.push(item.src);
        }

        info!(
            "Batch {:?} complete: {} ok, {} failed, {} cancelled",
            kind,
            total - report.failed.len() - report.cancelled.len(),
            report.failed.len(),
            report.cancelled.len()
        );

        report
    }

    #[allow(clippy::too_many_arguments)]
    fn run_worker(
        &self,
        worker_id: usize,
        resolver: &SessionResolver,
        spec: &ConnectSpec,
        kind: TransferKind,
        rx: Receiver<TransferItem>,
        cancel: &CancelToken,
        failed: &Mutex<Vec<String>>,
        cancelled: &Mutex<Vec<String>>,
    ) {
        let session = match resolver.open(spec) {
            Ok(session) => session,
            Err(e) => {
                error!("Worker {} failed to open a session: {}", worker_id, e);
                return;
            }
        };

        // Guard closes the worker's session on every exit path
        let mut guard = ScopedSession::owned(session);

        while let Ok(item) = rx.try_recv() {
            if cancel.is_cancelled() {
                cancelled.lock().push(item.src);
                continue;
            }

            self.transfer_with_retry(guard.session(), &item, kind, cancel, failed, cancelled);
        }
    }

    /// Drive one item through the retry loop, demoting the final error to a
    /// report entry instead of propagating it.
    fn transfer_with_retry(
        &self,
        session: &mut dyn Session,
        item: &TransferItem,
        kind: TransferKind,
        cancel: &CancelToken,
        failed: &Mutex<Vec<String>>,
        cancelled: &Mutex<Vec<String>>,
    ) {
        let mut last_error: Option<TransferError> = None;

        for attempt in 0..self.retries {
            if cancel.is_cancelled() {
                info!("Transfer of {} cancelled", item.src);
                cancelled.lock().push(item.src.clone());
                return;
            }

            let outcome = match kind {
                TransferKind::Download => ops::download_one(
                    session,
                    &item.src,
                    &item.dst,
                    item.overwrite,
                    item.create_dirs,
                ),
                TransferKind::Upload => ops::upload_one(
                    session,
                    &item.src,
                    &item.dst,
                    item.overwrite,
                    item.create_dirs,
                ),
            };

            match outcome {
                Ok(()) => return,
                Err(e) => {
                    info!(
                        "Retry {}/{} on data transfer {}",
                        attempt + 1,
                        self.retries,
                        item.src
                    );
                    last_error = Some(e);
                    if attempt + 1 < self.retries {
                        thread::sleep(self.backoff.delay(attempt));
                    }
                }
            }
        }

        if let Some(e) = last_error {
            error!(
                "Giving up on {} after {} attempts: {}",
                item.src, self.retries, e
            );
        }
        failed.lock().push(item.src.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_default_to_safe_overwrite() {
        let options = TransferOptions::default();
        assert!(!options.overwrite);
        assert!(options.create_dirs);
    }

    #[test]
    fn test_item_carries_policy() {
        let item = TransferItem::new(
            "/remote/a",
            "/local/a",
            TransferOptions {
                overwrite: true,
                create_dirs: false,
            },
        );
        assert_eq!(item.src, "/remote/a");
        assert_eq!(item.dst, "/local/a");
        assert!(item.overwrite);
        assert!(!item.create_dirs);
    }

    #[test]
    fn test_empty_report_is_clean() {
        let report = TransferReport::default();
        assert!(report.is_clean());

        let report = TransferReport {
            failed: vec!["/a".into()],
            cancelled: Vec::new(),
        };
        assert!(!report.is_clean());
    }
}
