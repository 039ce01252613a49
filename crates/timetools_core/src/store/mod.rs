//! Crash-safe JSON persistence.
//!
//! # Responsibility
//! - Load JSON documents, treating "missing" and "corrupt" alike as absent.
//! - Replace JSON documents so the target path only ever holds complete
//!   old contents or complete new contents.
//!
//! # Invariants
//! - A failed write leaves the target path untouched and leaves no
//!   temporary file behind.
//! - Neither operation panics; failures are logged and returned as values.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::PathBuf;

mod atomic;

pub use atomic::{load_document, load_json, write_json};

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure while replacing a JSON document on disk.
#[derive(Debug)]
pub enum StoreError {
    CreateDir { path: PathBuf, source: io::Error },
    CreateTemp { dir: PathBuf, source: io::Error },
    Serialize { path: PathBuf, source: serde_json::Error },
    Write { path: PathBuf, source: io::Error },
    Persist { path: PathBuf, source: io::Error },
}

impl StoreError {
    /// Stable short code used in diagnostic log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::CreateDir { .. } => "create_dir_failed",
            Self::CreateTemp { .. } => "create_temp_failed",
            Self::Serialize { .. } => "serialize_failed",
            Self::Write { .. } => "write_failed",
            Self::Persist { .. } => "rename_failed",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CreateDir { path, source } => {
                write!(f, "failed to create directory `{}`: {source}", path.display())
            }
            Self::CreateTemp { dir, source } => write!(
                f,
                "failed to create temporary file in `{}`: {source}",
                dir.display()
            ),
            Self::Serialize { path, source } => {
                write!(f, "failed to serialize document for `{}`: {source}", path.display())
            }
            Self::Write { path, source } => {
                write!(f, "failed to write document for `{}`: {source}", path.display())
            }
            Self::Persist { path, source } => {
                write!(f, "failed to replace `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CreateDir { source, .. }
            | Self::CreateTemp { source, .. }
            | Self::Write { source, .. }
            | Self::Persist { source, .. } => Some(source),
            Self::Serialize { source, .. } => Some(source),
        }
    }
}
