//! Client facade
//!
//! Public entry points for single-item operations, bulk batches, and
//! directory-tree transfers. Every call resolves its session through the
//! resolver and runs under the scope guard, so session lifetime is handled
//! here once rather than at every call site.

use log::debug;
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;
use walkdir::WalkDir;

use crate::config::ClientConfig;
use crate::engine::{
    CancelToken, TransferEngine, TransferItem, TransferKind, TransferOptions, TransferReport,
};
use crate::error::{ClientError, TransferError};
use crate::ops;
use crate::session::{
    ConnectSpec, Connector, PlainVault, ScopedSession, Session, SessionResolver, SessionSource,
    Vault,
};
use crate::walk::{TreeWalker, walk};

/// Bulk FTP transfer client.
pub struct RaxFtpClient {
    resolver: SessionResolver,
    engine: TransferEngine,
}

impl RaxFtpClient {
    /// Build a client over a connector, with plaintext credential blobs.
    pub fn new(config: ClientConfig, connector: Arc<dyn Connector>) -> Self {
        Self::with_vault(config, connector, Arc::new(PlainVault))
    }

    /// Build a client with a custom credential vault.
    pub fn with_vault(
        config: ClientConfig,
        connector: Arc<dyn Connector>,
        vault: Arc<dyn Vault>,
    ) -> Self {
        let engine = TransferEngine::from_config(&config);
        let resolver = SessionResolver::new(config, connector, vault);
        Self { resolver, engine }
    }

    pub fn resolver(&self) -> &SessionResolver {
        &self.resolver
    }

    // ─── Single-item operations ──────────────────────────────────────

    /// Lists files and directories of the given remote path.
    pub fn ls(&self, source: SessionSource<'_>, path: &str) -> Result<Vec<String>, ClientError> {
        let mut guard = self.resolver.resolve(source)?;
        Ok(ops::ls(guard.session(), path)?)
    }

    /// Checks whether the given remote path is a directory.
    pub fn is_dir(&self, source: SessionSource<'_>, path: &str) -> Result<bool, ClientError> {
        let mut guard = self.resolver.resolve(source)?;
        Ok(ops::is_dir(guard.session(), path)?)
    }

    /// Creates the given remote directory and every missing ancestor.
    pub fn make_dirs(&self, source: SessionSource<'_>, path: &str) -> Result<(), ClientError> {
        let mut guard = self.resolver.resolve(source)?;
        Ok(ops::make_dirs(guard.session(), path)?)
    }

    /// Downloads one remote file.
    pub fn download(
        &self,
        source: SessionSource<'_>,
        src: &str,
        dst: &str,
        options: TransferOptions,
    ) -> Result<(), ClientError> {
        let mut guard = self.resolver.resolve(source)?;
        Ok(ops::download_one(
            guard.session(),
            src,
            dst,
            options.overwrite,
            options.create_dirs,
        )?)
    }

    /// Uploads one local file.
    pub fn upload(
        &self,
        source: SessionSource<'_>,
        src: &str,
        dst: &str,
        options: TransferOptions,
    ) -> Result<(), ClientError> {
        let mut guard = self.resolver.resolve(source)?;
        Ok(ops::upload_one(
            guard.session(),
            src,
            dst,
            options.overwrite,
            options.create_dirs,
        )?)
    }

    /// Walks the remote tree below `root` on a caller-held session,
    /// yielding matching file paths depth-first.
    pub fn walk<'a>(
        &self,
        session: &'a mut dyn Session,
        root: &str,
        pattern: Option<&str>,
    ) -> Result<TreeWalker<'a>, ClientError> {
        Ok(walk(session, root, pattern)?)
    }

    // ─── Bulk operations ─────────────────────────────────────────────

    /// Downloads multiple remote files in parallel. Keys of `files` are
    /// remote sources, values are local destinations. Returns the report of
    /// sources that could not be transferred.
    pub fn download_multiple(
        &self,
        spec: &ConnectSpec,
        files: HashMap<String, String>,
        options: TransferOptions,
    ) -> TransferReport {
        let items = Self::items_from_map(files, options);
        self.engine
            .run(&self.resolver, spec, items, TransferKind::Download)
    }

    /// Uploads multiple local files in parallel. Keys of `files` are local
    /// sources, values are remote destinations.
    pub fn upload_multiple(
        &self,
        spec: &ConnectSpec,
        files: HashMap<String, String>,
        options: TransferOptions,
    ) -> TransferReport {
        let items = Self::items_from_map(files, options);
        self.engine
            .run(&self.resolver, spec, items, TransferKind::Upload)
    }

    /// Fully general batch entry point with caller-controlled cancellation.
    pub fn run_batch(
        &self,
        spec: &ConnectSpec,
        items: Vec<TransferItem>,
        kind: TransferKind,
        cancel: &CancelToken,
    ) -> TransferReport {
        self.engine
            .run_with_cancel(&self.resolver, spec, items, kind, cancel)
    }

    // ─── Tree operations ─────────────────────────────────────────────

    /// Downloads the contents of a remote directory tree, preserving its
    /// layout below `dst_root`. Files are enumerated depth-first and
    /// optionally filtered by `pattern` before the batch runs.
    pub fn download_tree(
        &self,
        spec: &ConnectSpec,
        src_root: &str,
        dst_root: &str,
        pattern: Option<&str>,
        options: TransferOptions,
    ) -> Result<TransferReport, ClientError> {
        let mut items = Vec::new();
        {
            let mut guard = ScopedSession::owned(self.resolver.open(spec)?);
            for entry in walk(guard.session(), src_root, pattern)? {
                let path = entry?;
                let dst = rebase(&path, src_root, dst_root);
                items.push(TransferItem::new(path, dst, options));
            }
        }

        debug!("Tree walk below {} found {} files", src_root, items.len());
        Ok(self
            .engine
            .run(&self.resolver, spec, items, TransferKind::Download))
    }

    /// Uploads a local directory tree, preserving its layout below
    /// `dst_root` on the remote side.
    pub fn upload_tree(
        &self,
        spec: &ConnectSpec,
        src_root: &str,
        dst_root: &str,
        pattern: Option<&str>,
        options: TransferOptions,
    ) -> Result<TransferReport, ClientError> {
        let pattern = match pattern {
            Some(p) => Some(Regex::new(p).map_err(|e| TransferError::Pattern(e.to_string()))?),
            None => None,
        };

        let mut items = Vec::new();
        for entry in WalkDir::new(src_root) {
            let entry = entry.map_err(|e| TransferError::LocalIo(e.into()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path().to_string_lossy().to_string();
            if pattern.as_ref().is_none_or(|re| re.is_match(&path)) {
                let dst = rebase(&path, src_root, dst_root);
                items.push(TransferItem::new(path, dst, options));
            }
        }

        debug!("Local walk below {} found {} files", src_root, items.len());
        Ok(self
            .engine
            .run(&self.resolver, spec, items, TransferKind::Upload))
    }

    fn items_from_map(
        files: HashMap<String, String>,
        options: TransferOptions,
    ) -> Vec<TransferItem> {
        files
            .into_iter()
            .map(|(src, dst)| TransferItem::new(src, dst, options))
            .collect()
    }
}

/// Moves `path` from below `src_root` to below `dst_root`, preserving the
/// relative tail. Prefix-based, so repeated occurrences of the root string
/// deeper in the path are left alone.
fn rebase(path: &str, src_root: &str, dst_root: &str) -> String {
    let tail = path
        .strip_prefix(src_root)
        .unwrap_or(path)
        .trim_start_matches('/');

    if tail.is_empty() {
        return dst_root.to_string();
    }

    if dst_root.ends_with('/') {
        format!("{}{}", dst_root, tail)
    } else {
        format!("{}/{}", dst_root, tail)
    }
}
