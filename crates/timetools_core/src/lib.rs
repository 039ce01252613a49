//! Core persistence for Time Tools: local accounts and tracked-time totals.
//! This crate is the single source of truth for crash-safety and credential
//! invariants.

pub mod account;
pub mod logging;
pub mod metric;
pub mod model;
pub mod paths;
pub mod store;

pub use account::password::DEFAULT_PBKDF2_ITERATIONS;
pub use account::{AccountError, AccountResult, CredentialVault, VaultConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use metric::{MetricError, MetricResult, TotalTimeTracker};
pub use model::user::{
    default_settings, derive_user_id, Settings, UserEntry, UserRecord, VaultDocument,
};
pub use paths::AppPaths;
pub use store::{load_document, load_json, write_json, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
