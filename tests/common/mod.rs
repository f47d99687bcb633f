#![allow(dead_code)] // each test binary uses a different slice of this module

//! Shared in-memory remote for integration tests
//!
//! Simulates a session-oriented remote file store: a directory tree, a
//! current-directory cursor per session, and listing semantics that report
//! missing paths as command refusals. Transfer attempts are counted per
//! path and failures can be scripted, which is what the retry and
//! exactly-once properties assert against.

use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet};
use std::io::{Read, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use rax_ftp_client::{
    CancelToken, ConnectionDescriptor, Connector, ResolveError, Session, TransferError,
};

/// Route crate logs through the test harness (RUST_LOG picks the level).
pub fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Default)]
struct RemoteState {
    files: BTreeMap<String, Vec<u8>>,
    dirs: BTreeSet<String>,
    mkdir_log: Vec<String>,
}

/// Handle to the simulated remote, shared by all sessions it spawns.
#[derive(Clone, Default)]
pub struct MemoryRemote {
    state: Arc<Mutex<RemoteState>>,
    /// Remaining scripted failures per path, consumed per attempt.
    fail_plan: Arc<Mutex<BTreeMap<String, usize>>>,
    /// retrieve/store invocations per path, including failed ones.
    transfer_counts: Arc<Mutex<BTreeMap<String, usize>>>,
    /// Cancel this token right after the named path transfers.
    cancel_after: Arc<Mutex<Option<(String, CancelToken)>>>,
    sessions_opened: Arc<AtomicUsize>,
    sessions_closed: Arc<AtomicUsize>,
}

impl MemoryRemote {
    pub fn new() -> Self {
        let remote = Self::default();
        remote.add_dir("/");
        remote
    }

    pub fn add_dir(&self, path: &str) {
        let mut state = self.state.lock();
        state.dirs.insert(path.to_string());
    }

    pub fn add_file(&self, path: &str, contents: &[u8]) {
        let mut state = self.state.lock();
        state.files.insert(path.to_string(), contents.to_vec());
    }

    pub fn file(&self, path: &str) -> Option<Vec<u8>> {
        self.state.lock().files.get(path).cloned()
    }

    pub fn has_dir(&self, path: &str) -> bool {
        self.state.lock().dirs.contains(path)
    }

    pub fn mkdir_log(&self) -> Vec<String> {
        self.state.lock().mkdir_log.clone()
    }

    /// Make the next `times` retrieve/store attempts on `path` fail.
    pub fn fail_times(&self, path: &str, times: usize) {
        self.fail_plan.lock().insert(path.to_string(), times);
    }

    /// Cancel `token` as soon as `path` has transferred successfully.
    pub fn cancel_after(&self, path: &str, token: &CancelToken) {
        *self.cancel_after.lock() = Some((path.to_string(), token.clone()));
    }

    pub fn transfer_count(&self, path: &str) -> usize {
        self.transfer_counts.lock().get(path).copied().unwrap_or(0)
    }

    pub fn sessions_opened(&self) -> usize {
        self.sessions_opened.load(Ordering::SeqCst)
    }

    pub fn sessions_closed(&self) -> usize {
        self.sessions_closed.load(Ordering::SeqCst)
    }

    pub fn session(&self) -> MemorySession {
        self.sessions_opened.fetch_add(1, Ordering::SeqCst);
        MemorySession {
            remote: self.clone(),
            cwd: "/".to_string(),
            binary: false,
            closed: false,
        }
    }

    /// True when a scripted failure for `path` was consumed by this call.
    fn consume_failure(&self, path: &str) -> bool {
        let mut plan = self.fail_plan.lock();
        match plan.get_mut(path) {
            Some(0) => false,
            Some(remaining) => {
                *remaining -= 1;
                true
            }
            None => false,
        }
    }

    fn count_transfer(&self, path: &str) {
        *self.transfer_counts.lock().entry(path.to_string()).or_insert(0) += 1;
    }

    fn fire_cancel_hook(&self, path: &str) {
        let hook = self.cancel_after.lock();
        if let Some((target, token)) = hook.as_ref() {
            if target == path {
                token.cancel();
            }
        }
    }
}

fn parent_of(path: &str) -> String {
    match path.rsplit_once('/') {
        Some(("", _)) => "/".to_string(),
        Some((parent, _)) => parent.to_string(),
        None => "/".to_string(),
    }
}

/// One simulated control connection with its own cursor.
pub struct MemorySession {
    remote: MemoryRemote,
    cwd: String,
    binary: bool,
    closed: bool,
}

impl Session for MemorySession {
    fn current_dir(&mut self) -> Result<String, TransferError> {
        Ok(self.cwd.clone())
    }

    fn change_dir(&mut self, path: &str) -> Result<(), TransferError> {
        if self.remote.has_dir(path) {
            self.cwd = path.to_string();
            Ok(())
        } else {
            Err(TransferError::remote(path, "550 Not a directory"))
        }
    }

    fn list(&mut self, path: &str) -> Result<Vec<String>, TransferError> {
        let state = self.remote.state.lock();

        if state.files.contains_key(path) {
            return Ok(vec![path.to_string()]);
        }

        if state.dirs.contains(path) {
            let mut entries: Vec<String> = state
                .files
                .keys()
                .chain(state.dirs.iter())
                .filter(|p| p.as_str() != path && parent_of(p.as_str()) == path)
                .cloned()
                .collect();
            entries.sort();
            return Ok(entries);
        }

        Err(TransferError::remote(path, "550 No such file or directory"))
    }

    fn make_dir(&mut self, path: &str) -> Result<(), TransferError> {
        let mut state = self.remote.state.lock();
        if state.dirs.contains(path) {
            return Err(TransferError::remote(path, "550 Directory exists"));
        }
        state.dirs.insert(path.to_string());
        state.mkdir_log.push(path.to_string());
        Ok(())
    }

    fn set_binary(&mut self) -> Result<(), TransferError> {
        self.binary = true;
        Ok(())
    }

    fn retrieve(&mut self, path: &str, sink: &mut dyn Write) -> Result<u64, TransferError> {
        self.remote.count_transfer(path);

        if self.remote.consume_failure(path) {
            return Err(TransferError::remote(path, "426 Transfer aborted"));
        }

        let contents = self
            .remote
            .file(path)
            .ok_or_else(|| TransferError::remote(path, "550 No such file"))?;
        sink.write_all(&contents)?;

        self.remote.fire_cancel_hook(path);
        Ok(contents.len() as u64)
    }

    fn store(&mut self, path: &str, source: &mut dyn Read) -> Result<u64, TransferError> {
        self.remote.count_transfer(path);

        if self.remote.consume_failure(path) {
            return Err(TransferError::remote(path, "426 Transfer aborted"));
        }

        if !self.remote.has_dir(&parent_of(path)) {
            return Err(TransferError::remote(path, "550 No such directory"));
        }

        let mut contents = Vec::new();
        source.read_to_end(&mut contents)?;
        let written = contents.len() as u64;
        self.remote
            .state
            .lock()
            .files
            .insert(path.to_string(), contents);

        self.remote.fire_cancel_hook(path);
        Ok(written)
    }

    fn close(&mut self) -> Result<(), TransferError> {
        assert!(!self.closed, "session closed twice");
        self.closed = true;
        self.remote.sessions_closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Connector handing out sessions on the shared remote, with scriptable
/// connect failures.
#[derive(Clone)]
pub struct MemoryConnector {
    remote: MemoryRemote,
    connect_failures: Arc<Mutex<usize>>,
}

impl MemoryConnector {
    pub fn new(remote: &MemoryRemote) -> Self {
        Self {
            remote: remote.clone(),
            connect_failures: Arc::new(Mutex::new(0)),
        }
    }

    /// Make the next `times` connect attempts fail authentication.
    pub fn fail_connects(&self, times: usize) {
        *self.connect_failures.lock() = times;
    }
}

impl Connector for MemoryConnector {
    fn connect(
        &self,
        descriptor: &ConnectionDescriptor,
    ) -> Result<Box<dyn Session>, ResolveError> {
        let mut failures = self.connect_failures.lock();
        if *failures > 0 {
            *failures -= 1;
            return Err(ResolveError::Authentication(format!(
                "530 Login incorrect for {}@{}",
                descriptor.user, descriptor.host
            )));
        }
        Ok(Box::new(self.remote.session()))
    }
}
