//! File-backed account vault.

use super::password::{
    generate_salt, hash_password, verify_password, DEFAULT_PBKDF2_ITERATIONS, SALT_LEN,
};
use super::{AccountError, AccountResult};
use crate::model::user::{default_settings, derive_user_id, Settings, UserRecord, VaultDocument};
use crate::store::{load_json, write_json, StoreResult};
use log::{debug, info, warn};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

const USERS_KEY: &str = "users";
/// Salt used to burn the same derivation cost when a username is unknown.
const UNKNOWN_USER_SALT: [u8; SALT_LEN] = [0u8; SALT_LEN];

/// Tunables for the vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VaultConfig {
    /// PBKDF2 iteration count for newly created users.
    ///
    /// Each record stores the count it was hashed with, so changing this
    /// value only affects users created afterwards.
    pub iterations: u32,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_PBKDF2_ITERATIONS,
        }
    }
}

/// Account collection mirrored to a JSON file.
///
/// The whole document sits behind one lock, so a vault can be shared across
/// threads. Write failures are logged and otherwise ignored: the in-memory
/// state stays authoritative until the next successful write.
pub struct CredentialVault {
    path: PathBuf,
    config: VaultConfig,
    document: Mutex<VaultDocument>,
}

impl CredentialVault {
    /// Opens the vault at `path` with default hashing parameters.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::open_with_config(path, VaultConfig::default())
    }

    /// Opens the vault at `path`.
    ///
    /// A missing or unparseable file starts an empty vault. A parseable
    /// document whose `users` key is absent or not an array gets an empty
    /// list, keeping its other keys. In those cases the result is written out
    /// immediately. Any other parseable document is kept as is, including
    /// user entries that fail to decode.
    pub fn open_with_config(path: impl Into<PathBuf>, config: VaultConfig) -> Self {
        let path = path.into();
        let (document, needs_write) = match load_json(&path) {
            Some(raw) => decode_document(&path, raw),
            None => (VaultDocument::default(), true),
        };

        info!(
            "event=vault_open module=account status=ok path={} users={} initialized={}",
            path.display(),
            document.records().count(),
            needs_write
        );

        let vault = Self {
            path,
            config,
            document: Mutex::new(document),
        };
        if needs_write {
            let _ = vault.persist();
        }
        vault
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> VaultConfig {
        self.config
    }

    /// Creates a user, returning `true` when the account was added.
    ///
    /// Rejections (blank username, empty password, taken username) return
    /// `false` without touching memory or disk.
    pub fn create_user(&self, username: &str, password: &str) -> bool {
        self.try_create_user(username, password).is_ok()
    }

    /// Creates a user and returns the stored record.
    ///
    /// The username is trimmed before validation and storage. New users get
    /// [`default_settings`].
    ///
    /// # Errors
    /// Returns [`AccountError`] describing why the input was rejected.
    pub fn try_create_user(&self, username: &str, password: &str) -> AccountResult<UserRecord> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AccountError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(AccountError::EmptyPassword);
        }
        if self.lock().contains(username) {
            debug!("event=user_create module=account status=rejected reason=duplicate");
            return Err(AccountError::DuplicateUsername(username.to_string()));
        }

        // Derivation is slow; keep it outside the lock.
        let salt = generate_salt();
        let pw_hash = hash_password(password, &salt, self.config.iterations);
        let record = UserRecord {
            id: derive_user_id(username),
            username: username.to_string(),
            salt: hex::encode(salt),
            pw_hash: hex::encode(pw_hash),
            iterations: Some(self.config.iterations),
            settings: default_settings(),
            extra: Map::new(),
        };

        let mut document = self.lock();
        // Another thread may have claimed the name while we were hashing.
        if document.contains(username) {
            return Err(AccountError::DuplicateUsername(username.to_string()));
        }
        document.push(record.clone());
        info!(
            "event=user_create module=account status=ok users={}",
            document.users.len()
        );
        let _ = self.write_document(&document);

        Ok(record)
    }

    /// Checks `password` against the stored hash for `username`.
    ///
    /// The record's own iteration count is used. Unknown usernames still pay
    /// a full derivation at the configured count.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        let stored = self.lock().find(username).map(|user| {
            (
                user.salt.clone(),
                user.pw_hash.clone(),
                user.iterations.unwrap_or(DEFAULT_PBKDF2_ITERATIONS),
            )
        });

        match stored {
            Some((salt, pw_hash, iterations)) => {
                verify_password(password, &salt, &pw_hash, iterations)
            }
            None => {
                std::hint::black_box(hash_password(
                    password,
                    &UNKNOWN_USER_SALT,
                    self.config.iterations,
                ));
                false
            }
        }
    }

    /// Returns a copy of the record for `username`.
    pub fn get_user(&self, username: &str) -> Option<UserRecord> {
        self.lock().find(username).cloned()
    }

    /// Shallow-merges `settings` into the user's settings and persists.
    ///
    /// Keys present in `settings` overwrite, other keys are kept. Unknown
    /// usernames are ignored.
    pub fn update_settings(&self, username: &str, settings: Settings) {
        let mut document = self.lock();
        let Some(user) = document.find_mut(username) else {
            debug!("event=settings_update module=account status=skipped reason=unknown_user");
            return;
        };
        let changed = settings.len();
        user.settings.extend(settings);
        info!(
            "event=settings_update module=account status=ok keys={}",
            changed
        );
        let _ = self.write_document(&document);
    }

    /// Usernames of decodable records, in stored order.
    pub fn list_users(&self) -> Vec<String> {
        self.lock()
            .records()
            .map(|user| user.username.clone())
            .collect()
    }

    /// Writes the current document to disk.
    ///
    /// # Errors
    /// Returns the underlying store error; the in-memory state is unchanged.
    pub fn persist(&self) -> StoreResult<()> {
        let document = self.lock();
        self.write_document(&document)
    }

    fn write_document(&self, document: &VaultDocument) -> StoreResult<()> {
        write_json(&self.path, document)
    }

    fn lock(&self) -> MutexGuard<'_, VaultDocument> {
        self.document.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Returns the decoded document and whether it must be rewritten.
///
/// Only documents without a usable `users` array are rewritten; a parsed
/// file with bad entries is never overwritten on open.
fn decode_document(path: &Path, raw: Value) -> (VaultDocument, bool) {
    let Value::Object(mut fields) = raw else {
        warn!(
            "event=vault_open module=account status=error error_code=not_an_object path={}",
            path.display()
        );
        return (VaultDocument::default(), true);
    };

    let needs_write = match fields.get(USERS_KEY) {
        Some(Value::Array(_)) => false,
        Some(_) => {
            warn!(
                "event=vault_open module=account status=error error_code=users_not_array path={}",
                path.display()
            );
            fields.remove(USERS_KEY);
            true
        }
        None => true,
    };

    match serde_json::from_value::<VaultDocument>(Value::Object(fields)) {
        Ok(document) => {
            let unreadable = document.unreadable_count();
            if unreadable > 0 {
                warn!(
                    "event=vault_open module=account status=degraded error_code=unreadable_users path={} count={}",
                    path.display(),
                    unreadable
                );
            }
            (document, needs_write)
        }
        Err(err) => {
            warn!(
                "event=vault_open module=account status=error error_code=invalid_document path={} error={}",
                path.display(),
                err
            );
            (VaultDocument::default(), false)
        }
    }
}
