//! Session persistence: a small key-value store and the signed-in pair.
//!
//! The on-disk layout is a single JSON object of string keys, the moral
//! equivalent of the browser storage the scheme grew out of. A session
//! exists only while both the username and identifier keys are present.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::ident::proper_case;

/// Storage key holding the proper-cased display name.
pub const USERNAME_KEY: &str = "username";

/// Storage key holding the five-digit identifier.
pub const IDENTIFIER_KEY: &str = "identifier";

/// Environment variable overriding where session state lives.
pub const STATE_DIR_ENV: &str = "MESSMATE_STATE_DIR";

const STATE_FILE: &str = "state.json";

// ---------------------------------------------------------------------------
// StoreError
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not create state directory {}: {message}", path.display())]
    CreateDir { path: PathBuf, message: String },

    #[error("could not read state file {}: {message}", path.display())]
    Read { path: PathBuf, message: String },

    #[error("could not write state file {}: {message}", path.display())]
    Write { path: PathBuf, message: String },

    #[error("could not encode session state: {message}")]
    Encode { message: String },

    #[error("state file {} is not valid JSON: {message}", path.display())]
    Decode { path: PathBuf, message: String },
}

// ---------------------------------------------------------------------------
// KeyValueStore
// ---------------------------------------------------------------------------

/// String-to-string storage with last-write-wins semantics.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Store backed by one JSON file under a state directory.
#[derive(Debug, Clone)]
pub struct FsKeyValueStore {
    path: PathBuf,
}

impl FsKeyValueStore {
    #[must_use]
    pub fn new(state_dir: &Path) -> Self {
        Self {
            path: state_dir.join(STATE_FILE),
        }
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    message: err.to_string(),
                })
            }
        };
        serde_json::from_str(&raw).map_err(|err| StoreError::Decode {
            path: self.path.clone(),
            message: err.to_string(),
        })
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|err| StoreError::CreateDir {
                path: parent.to_path_buf(),
                message: err.to_string(),
            })?;
        }
        let encoded = serde_json::to_string_pretty(entries).map_err(|err| StoreError::Encode {
            message: err.to_string(),
        })?;
        std::fs::write(&self.path, encoded).map_err(|err| StoreError::Write {
            path: self.path.clone(),
            message: err.to_string(),
        })
    }
}

impl KeyValueStore for FsKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.load()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }
}

/// In-memory store for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryKeyValueStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries().remove(key);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// SessionStore
// ---------------------------------------------------------------------------

/// A signed-in member: proper-cased name plus verified identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub username: String,
    pub identifier: String,
}

/// Reads and writes the session pair on top of a [`KeyValueStore`].
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Persist a verified sign-in. The name is proper-cased on the way in;
    /// the identifier is stored exactly as supplied.
    pub fn login(&self, name: &str, identifier: &str) -> Result<Session, StoreError> {
        let username = proper_case(name);
        self.store.set(USERNAME_KEY, &username)?;
        self.store.set(IDENTIFIER_KEY, identifier)?;
        Ok(Session {
            username,
            identifier: identifier.to_string(),
        })
    }

    /// Remove both halves of the pair.
    pub fn logout(&self) -> Result<(), StoreError> {
        self.store.remove(USERNAME_KEY)?;
        self.store.remove(IDENTIFIER_KEY)
    }

    /// The current session, if the full pair is present. A partial pair
    /// reads as signed out.
    pub fn current(&self) -> Result<Option<Session>, StoreError> {
        let username = self.store.get(USERNAME_KEY)?;
        let identifier = self.store.get(IDENTIFIER_KEY)?;
        match (username, identifier) {
            (Some(username), Some(identifier)) => Ok(Some(Session {
                username,
                identifier,
            })),
            _ => Ok(None),
        }
    }
}

/// Directory session state lives in: the override variable when set, else
/// `~/.local/share/messmate`, else the current directory.
#[must_use]
pub fn resolve_state_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(STATE_DIR_ENV) {
        let trimmed = dir.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    match std::env::var("HOME") {
        Ok(home) if !home.trim().is_empty() => {
            PathBuf::from(home).join(".local/share/messmate")
        }
        _ => PathBuf::from("."),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn memory_session_store() -> SessionStore {
        SessionStore::new(Arc::new(MemoryKeyValueStore::new()))
    }

    // -- key-value backends --

    #[test]
    fn memory_store_round_trips_keys() {
        let store = MemoryKeyValueStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap(), Some("v".to_string()));
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn fs_store_persists_across_instances() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FsKeyValueStore::new(dir.path());
        store.set("username", "Bob").unwrap();

        let reopened = FsKeyValueStore::new(dir.path());
        assert_eq!(reopened.get("username").unwrap(), Some("Bob".to_string()));
    }

    #[test]
    fn fs_store_reads_missing_file_as_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FsKeyValueStore::new(dir.path());
        assert_eq!(store.get("anything").unwrap(), None);
        // A read, or removing an absent key, must not create the file.
        store.remove("anything").unwrap();
        assert!(!dir.path().join(STATE_FILE).exists());
    }

    #[test]
    fn fs_store_creates_missing_state_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("deep/state");
        let store = FsKeyValueStore::new(&nested);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap(), Some("v".to_string()));
    }

    #[test]
    fn fs_store_reports_corrupt_state_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join(STATE_FILE), "not json").unwrap();
        let store = FsKeyValueStore::new(dir.path());
        let err = store.get("k").unwrap_err();
        assert!(matches!(err, StoreError::Decode { .. }), "got {err:?}");
    }

    // -- session pair --

    #[test]
    fn login_proper_cases_the_name_and_persists_the_pair() {
        let sessions = memory_session_store();
        let session = sessions.login("abid ahmed", "26870").unwrap();
        assert_eq!(session.username, "Abid Ahmed");
        assert_eq!(session.identifier, "26870");

        let current = sessions.current().unwrap();
        assert_eq!(current, Some(session));
    }

    #[test]
    fn current_requires_the_full_pair() {
        let store = Arc::new(MemoryKeyValueStore::new());
        let sessions = SessionStore::new(Arc::clone(&store) as Arc<dyn KeyValueStore>);

        store.set(USERNAME_KEY, "Bob").unwrap();
        assert_eq!(sessions.current().unwrap(), None);

        store.set(IDENTIFIER_KEY, "26870").unwrap();
        assert!(sessions.current().unwrap().is_some());
    }

    #[test]
    fn logout_removes_both_keys() {
        let sessions = memory_session_store();
        sessions.login("bob", "26870").unwrap();
        sessions.logout().unwrap();
        assert_eq!(sessions.current().unwrap(), None);
    }

    #[test]
    fn resolve_state_dir_prefers_the_override_variable() {
        std::env::set_var(STATE_DIR_ENV, "/tmp/messmate-test-state");
        assert_eq!(
            resolve_state_dir(),
            PathBuf::from("/tmp/messmate-test-state")
        );
        std::env::remove_var(STATE_DIR_ENV);
    }
}
