//! Single-file transfer operations
//!
//! Upload and download of one file between the local filesystem and the
//! remote store, enforcing the overwrite policy and materializing missing
//! parent directories on either side.

use log::{debug, info};
use std::fs;
use std::path::Path;

use crate::error::TransferError;
use crate::ops::navigate::{exists, is_dir, make_dirs};
use crate::session::Session;

/// Lists files and directories of the given remote path.
pub fn ls(session: &mut dyn Session, path: &str) -> Result<Vec<String>, TransferError> {
    session.list(path)
}

/// Downloads one remote file to a local destination.
///
/// With `overwrite` false an existing destination fails with
/// `AlreadyExists` before any bytes move. With `create_dirs` true a missing
/// destination parent is created locally. On failure a partially written
/// destination may remain; the retry layer treats the item as redo-able.
pub fn download_one(
    session: &mut dyn Session,
    src: &str,
    dst: &str,
    overwrite: bool,
    create_dirs: bool,
) -> Result<(), TransferError> {
    session.set_binary()?;

    let dst_path = Path::new(dst);
    let dst_present = dst_path.is_file();

    if dst_present && !overwrite {
        return Err(TransferError::AlreadyExists(dst.to_string()));
    }

    if create_dirs {
        if let Some(parent) = dst_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                debug!("Create local directories for {}", dst);
                fs::create_dir_all(parent)?;
            }
        }
    }

    if dst_present {
        info!("Downloading {} and overwriting {}", src, dst);
    } else {
        info!("Downloading {} to {}", src, dst);
    }

    let mut sink = fs::File::create(dst_path)?;
    session.retrieve(src, &mut sink)?;

    Ok(())
}

/// Uploads one local file to a remote destination.
///
/// With `overwrite` false an existing remote destination fails with
/// `AlreadyExists` before the local file is even opened. With `create_dirs`
/// true a missing remote parent hierarchy is created first.
pub fn upload_one(
    session: &mut dyn Session,
    src: &str,
    dst: &str,
    overwrite: bool,
    create_dirs: bool,
) -> Result<(), TransferError> {
    let dst_present = exists(session, dst);

    if dst_present && !overwrite {
        return Err(TransferError::AlreadyExists(dst.to_string()));
    }

    if create_dirs {
        if let Some((parent, _)) = dst.rsplit_once('/') {
            if !parent.is_empty() && !is_dir(session, parent)? {
                make_dirs(session, parent)?;
            }
        }
    }

    if dst_present {
        info!("Uploading {} and overwriting {}", src, dst);
    } else {
        info!("Uploading {} to {}", src, dst);
    }

    session.set_binary()?;
    let mut source = fs::File::open(src)?;
    session.store(dst, &mut source)?;

    Ok(())
}
