use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::errors::AdminError;

/// Key holding `"true"` while an admin session is active.
pub const AUTH_FLAG_KEY: &str = "isAdminAuthenticated";

/// Durable key/value storage that survives restarts, scoped to one machine.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, AdminError>;
    fn set(&self, key: &str, value: &str) -> Result<(), AdminError>;
    fn remove(&self, key: &str) -> Result<(), AdminError>;
}

/// Stores all keys as one flat JSON object in a file.
/// A missing file reads as empty storage; the file is created on first write.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, AdminError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str(&raw) {
            Ok(map) => Ok(map),
            Err(e) => {
                // An unreadable session file means no session.
                warn!("Ignoring corrupt session file {}: {e}", self.path.display());
                Ok(BTreeMap::new())
            }
        }
    }

    fn save(&self, map: &BTreeMap<String, String>) -> Result<(), AdminError> {
        let json = serde_json::to_string_pretty(map)
            .map_err(|e| std::io::Error::new(ErrorKind::InvalidData, e))?;
        std::fs::write(&self.path, json)?;
        debug!("Session file {} written", self.path.display());
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, AdminError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AdminError> {
        let mut map = self.load()?;
        map.insert(key.to_string(), value.to_string());
        self.save(&map)
    }

    fn remove(&self, key: &str) -> Result<(), AdminError> {
        let mut map = self.load()?;
        if map.remove(key).is_some() {
            self.save(&map)?;
        }
        Ok(())
    }
}

/// In-memory storage for tests.
#[cfg(test)]
#[derive(Default)]
pub struct MemorySessionStore {
    map: std::sync::Mutex<BTreeMap<String, String>>,
}

#[cfg(test)]
impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, AdminError> {
        Ok(self.map.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AdminError> {
        self.map
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), AdminError> {
        self.map.lock().unwrap().remove(key);
        Ok(())
    }
}
