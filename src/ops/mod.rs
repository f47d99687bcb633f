//! Single-item path operations
//!
//! Primitive operations against one session: listing, directory probing and
//! creation, and single-file transfers. These raise immediately on failure;
//! resilience lives in the engine's retry loop.

pub mod files;
pub mod navigate;

pub use files::{download_one, ls, upload_one};
pub use navigate::{exists, is_dir, make_dirs};
