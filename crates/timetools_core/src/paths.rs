//! File locations under one application data root.

use std::path::{Path, PathBuf};

const ACCOUNTS_FILE_NAME: &str = "accounts.json";
const TOTAL_TIME_FILE_NAME: &str = "total_time.json";
const LOGS_DIR_NAME: &str = "logs";

/// Resolved paths for every file core owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    root: PathBuf,
}

impl AppPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Backing file of the credential vault.
    pub fn accounts_file(&self) -> PathBuf {
        self.root.join(ACCOUNTS_FILE_NAME)
    }

    /// Backing file of the total-time tracker.
    pub fn total_time_file(&self) -> PathBuf {
        self.root.join(TOTAL_TIME_FILE_NAME)
    }

    /// Directory handed to `init_logging`.
    pub fn log_dir(&self) -> PathBuf {
        self.root.join(LOGS_DIR_NAME)
    }
}
