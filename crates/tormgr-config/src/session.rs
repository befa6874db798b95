//! Session store
//!
//! Holds the signed-in user and the auth token. Every key is persisted
//! individually under the [`STORAGE_ROOT`] namespace with a JSON-encoded value,
//! and every mutation writes through to the backend immediately.
//!
//! # Lifecycle
//!
//! 1. [`SessionStore::load`] scans the backend once and keeps the namespaced keys
//! 2. `set` / `remove` mutate memory and the backend
//! 3. `clear` removes every known key (sign-out)
//!
//! The store is constructed explicitly and shared as [`SharedSession`].

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Namespace prefix for every persisted session key
pub const STORAGE_ROOT: &str = "myfolders.session.";

/// Session shared between the API client and the action layer
pub type SharedSession = Arc<Mutex<SessionStore>>;

/// Persistence for fully qualified session keys and raw JSON values
///
/// Backends see the namespaced key (`myfolders.session.token`) and may hold
/// foreign keys as well; the store filters them on load.
pub trait SessionBackend: Send {
    /// All stored entries as (fully qualified key, raw JSON)
    fn entries(&self) -> Result<Vec<(String, String)>>;

    /// Store one raw value
    fn write(&mut self, fq_key: &str, raw: &str) -> Result<()>;

    /// Delete one key (missing keys are not an error)
    fn delete(&mut self, fq_key: &str) -> Result<()>;
}

/// In-memory backend
///
/// Clones share the same storage, so a fresh [`SessionStore`] over a clone
/// behaves like a reload.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value stored for a fully qualified key
    pub fn raw(&self, fq_key: &str) -> Option<String> {
        self.lock().get(fq_key).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionBackend for MemoryBackend {
    fn entries(&self) -> Result<Vec<(String, String)>> {
        Ok(self
            .lock()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn write(&mut self, fq_key: &str, raw: &str) -> Result<()> {
        self.lock().insert(fq_key.to_string(), raw.to_string());
        Ok(())
    }

    fn delete(&mut self, fq_key: &str) -> Result<()> {
        self.lock().remove(fq_key);
        Ok(())
    }
}

/// Durable backend: one JSON object file of `{fq_key: raw_json}`
///
/// The file is re-read and rewritten on every mutation.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backend at the default location in the config directory
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(crate::paths::session_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session file: {:?}", self.path))?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse session file: {:?}", self.path))
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content =
            serde_json::to_string_pretty(entries).context("Failed to serialize session")?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write session file: {:?}", self.path))
    }
}

impl SessionBackend for FileBackend {
    fn entries(&self) -> Result<Vec<(String, String)>> {
        Ok(self.read_all()?.into_iter().collect())
    }

    fn write(&mut self, fq_key: &str, raw: &str) -> Result<()> {
        let mut entries = self.read_all()?;
        entries.insert(fq_key.to_string(), raw.to_string());
        self.write_all(&entries)
    }

    fn delete(&mut self, fq_key: &str) -> Result<()> {
        let mut entries = self.read_all()?;
        if entries.remove(fq_key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

/// Session key/value store with write-through persistence
pub struct SessionStore {
    data: BTreeMap<String, Value>,
    backend: Box<dyn SessionBackend>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("keys", &self.data.keys().collect::<Vec<_>>())
            .field("signed_in", &self.is_signed_in())
            .finish()
    }
}

impl SessionStore {
    /// Load every namespaced key from the backend
    pub fn load(backend: impl SessionBackend + 'static) -> Result<Self> {
        let mut data = BTreeMap::new();
        for (fq_key, raw) in backend.entries()? {
            if let Some(key) = fq_key.strip_prefix(STORAGE_ROOT) {
                let value: Value = serde_json::from_str(&raw)
                    .with_context(|| format!("Invalid session value for key '{}'", key))?;
                data.insert(key.to_string(), value);
            }
        }
        log::debug!("session:load: {} keys", data.len());
        Ok(Self {
            data,
            backend: Box::new(backend),
        })
    }

    /// Empty session over an in-memory backend
    pub fn in_memory() -> Self {
        Self {
            data: BTreeMap::new(),
            backend: Box::new(MemoryBackend::new()),
        }
    }

    /// Wrap into the shared handle used by the client and the store
    pub fn shared(self) -> SharedSession {
        Arc::new(Mutex::new(self))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Write every entry to memory and to the backend
    pub fn set(&mut self, data: &Map<String, Value>) -> Result<()> {
        for (key, value) in data {
            self.set_value(key, value.clone())?;
        }
        Ok(())
    }

    pub fn set_value(&mut self, key: &str, value: Value) -> Result<()> {
        let raw = serde_json::to_string(&value).context("Failed to serialize session value")?;
        self.backend.write(&fq_key(key), &raw)?;
        self.data.insert(key.to_string(), value);
        Ok(())
    }

    pub fn remove(&mut self, key: &str) -> Result<()> {
        log::info!("session:delete:{}", key);
        self.data.remove(key);
        self.backend.delete(&fq_key(key))
    }

    /// Remove every currently known key
    pub fn clear(&mut self) -> Result<()> {
        log::info!("session:clear");
        let keys: Vec<String> = self.data.keys().cloned().collect();
        for key in keys {
            self.remove(&key)?;
        }
        Ok(())
    }

    pub fn is_signed_in(&self) -> bool {
        matches!(self.get("token"), Some(token) if !token.is_null())
    }

    pub fn token(&self) -> Option<&str> {
        self.get("token").and_then(Value::as_str)
    }

    pub fn user(&self) -> Option<&Value> {
        self.get("user").filter(|user| !user.is_null())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }
}

fn fq_key(key: &str) -> String {
    format!("{}{}", STORAGE_ROOT, key)
}
