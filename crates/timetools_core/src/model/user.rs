//! User record and per-user settings.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::{Debug, Formatter};

/// IANA time-zone identifier used when rendering clocks.
pub const SETTING_TIMEZONE: &str = "timezone";
/// `true` renders a 24-hour clock, `false` a 12-hour clock.
pub const SETTING_CLOCK_24H: &str = "clock_24h";
/// Whether clocks render seconds.
pub const SETTING_SHOW_SECONDS: &str = "show_seconds";

const DEFAULT_TIMEZONE: &str = "UTC";
const ID_SEPARATOR: &str = "_";

/// Open-ended per-user settings, keyed by setting name.
pub type Settings = Map<String, Value>;

/// Settings assigned to every newly created user.
pub fn default_settings() -> Settings {
    let mut settings = Settings::new();
    settings.insert(
        SETTING_TIMEZONE.to_string(),
        Value::String(DEFAULT_TIMEZONE.to_string()),
    );
    settings.insert(SETTING_CLOCK_24H.to_string(), Value::Bool(true));
    settings.insert(SETTING_SHOW_SECONDS.to_string(), Value::Bool(true));
    settings
}

/// Derives the stable user id: lower-cased, spaces replaced by `_`.
///
/// Usernames differing only by case map to the same id while remaining
/// distinct accounts; callers must not use the id as a uniqueness key.
pub fn derive_user_id(username: &str) -> String {
    username.to_lowercase().replace(' ', ID_SEPARATOR)
}

/// One account in the accounts document.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    /// Hex-encoded random salt.
    pub salt: String,
    /// Hex-encoded PBKDF2 output.
    pub pw_hash: String,
    /// PBKDF2 rounds `pw_hash` was derived with. Absent on records written
    /// before the count was stored, which used the baseline count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iterations: Option<u32>,
    #[serde(default)]
    pub settings: Settings,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserRecord {
    pub fn timezone(&self) -> Option<&str> {
        self.settings.get(SETTING_TIMEZONE).and_then(Value::as_str)
    }

    pub fn clock_24h(&self) -> Option<bool> {
        self.settings.get(SETTING_CLOCK_24H).and_then(Value::as_bool)
    }

    pub fn show_seconds(&self) -> Option<bool> {
        self.settings
            .get(SETTING_SHOW_SECONDS)
            .and_then(Value::as_bool)
    }
}

impl Debug for UserRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRecord")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("salt", &"<redacted>")
            .field("pw_hash", &"<redacted>")
            .field("iterations", &self.iterations)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

/// One element of the `users` array.
///
/// Entries that do not decode as a [`UserRecord`] are carried verbatim so a
/// rewrite of the file never drops them.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserEntry {
    Record(UserRecord),
    Unreadable(Value),
}

impl UserEntry {
    pub fn record(&self) -> Option<&UserRecord> {
        match self {
            Self::Record(record) => Some(record),
            Self::Unreadable(_) => None,
        }
    }

    pub fn record_mut(&mut self) -> Option<&mut UserRecord> {
        match self {
            Self::Record(record) => Some(record),
            Self::Unreadable(_) => None,
        }
    }

    /// Username of the entry, read from the raw value when it is unreadable.
    pub fn username(&self) -> Option<&str> {
        match self {
            Self::Record(record) => Some(record.username.as_str()),
            Self::Unreadable(raw) => raw.get("username").and_then(Value::as_str),
        }
    }
}

impl Debug for UserEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Record(record) => f.debug_tuple("Record").field(record).finish(),
            Self::Unreadable(_) => f
                .debug_tuple("Unreadable")
                .field(&self.username())
                .finish(),
        }
    }
}

/// Top-level shape of the accounts file: `{"users": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VaultDocument {
    #[serde(default)]
    pub users: Vec<UserEntry>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VaultDocument {
    /// Decodable user records in stored order.
    pub fn records(&self) -> impl Iterator<Item = &UserRecord> {
        self.users.iter().filter_map(UserEntry::record)
    }

    pub fn unreadable_count(&self) -> usize {
        self.users
            .iter()
            .filter(|entry| entry.record().is_none())
            .count()
    }

    pub fn push(&mut self, record: UserRecord) {
        self.users.push(UserEntry::Record(record));
    }

    pub fn find(&self, username: &str) -> Option<&UserRecord> {
        self.records().find(|user| user.username == username)
    }

    pub fn find_mut(&mut self, username: &str) -> Option<&mut UserRecord> {
        self.users
            .iter_mut()
            .filter_map(UserEntry::record_mut)
            .find(|user| user.username == username)
    }

    /// Whether any entry, readable or not, claims `username`.
    pub fn contains(&self, username: &str) -> bool {
        self.users
            .iter()
            .any(|entry| entry.username() == Some(username))
    }
}
