//! Local accounts: salted password storage and per-user settings.
//!
//! # Responsibility
//! - Own the accounts document and the file it is mirrored to.
//! - Hash passwords with a slow salted derivation; verify in constant time.
//!
//! # Invariants
//! - Usernames are unique under exact, case-sensitive comparison.
//! - Every mutation is persisted in full before the call returns.
//! - Passwords, salts and hashes are never logged.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod password;
mod vault;

pub use vault::{CredentialVault, VaultConfig};

pub type AccountResult<T> = Result<T, AccountError>;

/// Caller-input rejection from account creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountError {
    EmptyUsername,
    EmptyPassword,
    DuplicateUsername(String),
}

impl Display for AccountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username cannot be empty"),
            Self::EmptyPassword => write!(f, "password cannot be empty"),
            Self::DuplicateUsername(username) => {
                write!(f, "username already exists: {username}")
            }
        }
    }
}

impl Error for AccountError {}
