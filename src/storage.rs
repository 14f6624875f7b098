//! Persistent key-value store.
//!
//! A small JSON file holding string values, read and rewritten on each
//! operation. Values go in serialized as JSON text and come back parsed.
//! Failures are logged and reported through the return value only.

use crate::api::middleware::TokenSource;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::error;

/// Key holding the raw bearer token
pub const AUTH_TOKEN_KEY: &str = "authToken";

type Entries = BTreeMap<String, String>;

/// File-backed string map
#[derive(Debug)]
pub struct KeyValueStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process
    lock: Mutex<()>,
}

impl KeyValueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the value stored under `key`
    ///
    /// Returns `None` when the key is missing or the stored text does not parse as `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get_raw(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                error!("Error getting item from storage: {key}: {e}");
                None
            }
        }
    }

    /// Serialize `value` and store it under `key`
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        match serde_json::to_string(value) {
            Ok(text) => self.set_raw(key, &text),
            Err(e) => {
                error!("Error setting item in storage: {key}: {e}");
                false
            }
        }
    }

    /// Delete `key`; removing a missing key still succeeds
    pub fn remove(&self, key: &str) -> bool {
        match self.update(|entries| {
            entries.remove(key);
        }) {
            Ok(()) => true,
            Err(e) => {
                error!("Error removing item from storage: {key}: {e}");
                false
            }
        }
    }

    /// The stored text under `key`, without parsing
    pub fn get_raw(&self, key: &str) -> Option<String> {
        let Ok(_guard) = self.lock.lock() else {
            error!("Error getting item from storage: lock poisoned");
            return None;
        };
        match self.read_entries() {
            Ok(mut entries) => entries.remove(key),
            Err(e) => {
                error!("Error getting item from storage: {key}: {e}");
                None
            }
        }
    }

    /// Store `value` as-is under `key`
    pub fn set_raw(&self, key: &str, value: &str) -> bool {
        match self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        }) {
            Ok(()) => true,
            Err(e) => {
                error!("Error setting item in storage: {key}: {e}");
                false
            }
        }
    }

    fn update(&self, change: impl FnOnce(&mut Entries)) -> io::Result<()> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "storage lock poisoned"))?;
        let mut entries = self.read_entries()?;
        change(&mut entries);
        let text = serde_json::to_string_pretty(&entries)?;
        fs::write(&self.path, text)
    }

    fn read_entries(&self) -> io::Result<Entries> {
        match fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(Entries::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Entries::new()),
            Err(e) => Err(e),
        }
    }
}

impl TokenSource for KeyValueStore {
    fn token(&self) -> Option<String> {
        self.get_raw(AUTH_TOKEN_KEY).filter(|t| !t.is_empty())
    }
}
