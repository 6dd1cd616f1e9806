//! Session credential storage
//!
//! The bearer credential lives in a [`SessionStore`] under the fixed key
//! [`SESSION_KEY`]. The [`Session`] handle wraps a store and is injected into
//! the request client, the access gate and the console; nothing else reads
//! or writes the credential.

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Key the credential is stored under
pub const SESSION_KEY: &str = "token";

/// Storage for the bearer credential
pub trait SessionStore: Send + Sync {
    /// Current credential, `None` when absent or empty
    fn read(&self) -> Result<Option<String>>;

    /// Replace the stored credential
    fn write(&self, token: &str) -> Result<()>;

    /// Remove the stored credential
    fn clear(&self) -> Result<()>;
}

/// Process-local credential storage
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    token: RwLock<Option<String>>,
}

impl MemorySessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding a credential
    pub fn with_token(token: &str) -> Self {
        Self {
            token: RwLock::new(Some(token.to_string())),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn read(&self) -> Result<Option<String>> {
        let guard = self
            .token
            .read()
            .map_err(|_| Error::session("session lock poisoned"))?;
        Ok(guard.clone().filter(|t| !t.is_empty()))
    }

    fn write(&self, token: &str) -> Result<()> {
        let mut guard = self
            .token
            .write()
            .map_err(|_| Error::session("session lock poisoned"))?;
        *guard = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut guard = self
            .token
            .write()
            .map_err(|_| Error::session("session lock poisoned"))?;
        *guard = None;
        Ok(())
    }
}

/// Credential storage in a JSON object on disk.
///
/// Keys other than [`SESSION_KEY`] are left untouched. A missing file reads as
/// an empty store, and clearing the last key removes the file.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileSessionStore {
    /// Create a store backed by `path`; the file is created on first write
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Map<String, Value>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(err) => return Err(err.into()),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Map::new());
        }
        match serde_json::from_slice(&bytes)? {
            Value::Object(map) => Ok(map),
            _ => Err(Error::session(format!(
                "{} does not hold a JSON object",
                self.path.display()
            ))),
        }
    }

    fn save(&self, map: &Map<String, Value>) -> Result<()> {
        if map.is_empty() {
            return match fs::remove_file(&self.path) {
                Err(err) if err.kind() != ErrorKind::NotFound => Err(err.into()),
                _ => Ok(()),
            };
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(map)?)?;
        restrict_permissions(&self.path)?;
        Ok(())
    }

    fn guard(&self) -> Result<std::sync::MutexGuard<'_, ()>> {
        self.lock
            .lock()
            .map_err(|_| Error::session("session lock poisoned"))
    }
}

impl SessionStore for FileSessionStore {
    fn read(&self) -> Result<Option<String>> {
        let _guard = self.guard()?;
        let map = self.load()?;
        Ok(map
            .get(SESSION_KEY)
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .map(str::to_owned))
    }

    fn write(&self, token: &str) -> Result<()> {
        let _guard = self.guard()?;
        let mut map = self.load()?;
        map.insert(SESSION_KEY.to_string(), Value::String(token.to_string()));
        self.save(&map)
    }

    fn clear(&self) -> Result<()> {
        let _guard = self.guard()?;
        let mut map = self.load()?;
        if map.remove(SESSION_KEY).is_none() {
            return Ok(());
        }
        self.save(&map)
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

/// Shared handle to the credential store
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn SessionStore>,
}

impl Session {
    /// Wrap a store
    pub fn new<S: SessionStore + 'static>(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Wrap an already shared store
    pub fn from_store(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Empty in-memory session
    pub fn in_memory() -> Self {
        Self::new(MemorySessionStore::new())
    }

    /// Session persisted at `path`
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(FileSessionStore::new(path))
    }

    /// Current credential
    pub fn token(&self) -> Result<Option<String>> {
        self.store.read()
    }

    /// Persist a credential
    pub fn set_token(&self, token: &str) -> Result<()> {
        self.store.write(token)
    }

    /// Forget the credential
    pub fn clear(&self) -> Result<()> {
        self.store.clear()
    }

    /// Whether a credential is stored
    pub fn is_present(&self) -> Result<bool> {
        Ok(self.token()?.is_some())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}
