//! Durable storage for the session.
//!
//! The store mirrors every mutation through a [`SessionPersistence`] and reads
//! it back exactly once, when it is opened.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;

use crate::Session;

/// The single key the session lives under.
pub const STORAGE_KEY: &str = "user-store";

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage io error: {0}")]
    Io(#[from] io::Error),

    #[error("stored session is not valid json: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Save/load capability for the session.
pub trait SessionPersistence: Send + Sync {
    /// Read the stored session. `Ok(None)` means nothing has been stored yet.
    fn load(&self) -> Result<Option<Session>, PersistenceError>;

    fn save(&self, session: &Session) -> Result<(), PersistenceError>;
}

/// In-memory persistence.
///
/// Intended for tests/dev. Holds the serialized form so corrupt contents can be
/// simulated with [`MemoryPersistence::with_raw`].
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    raw: Mutex<Option<String>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with a session, as if a previous process had written it.
    pub fn with_session(session: &Session) -> Self {
        let raw = serde_json::to_string(session).ok();
        Self { raw: Mutex::new(raw) }
    }

    /// Seed with arbitrary stored text.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Mutex::new(Some(raw.into())),
        }
    }

    /// Current stored text, if any.
    pub fn raw(&self) -> Option<String> {
        self.raw.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl SessionPersistence for MemoryPersistence {
    fn load(&self) -> Result<Option<Session>, PersistenceError> {
        match self.raw() {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn save(&self, session: &Session) -> Result<(), PersistenceError> {
        let raw = serde_json::to_string(session)?;
        *self.raw.lock().unwrap_or_else(|e| e.into_inner()) = Some(raw);
        Ok(())
    }
}

/// File-backed persistence: one JSON document named after the storage key.
#[derive(Debug, Clone)]
pub struct FilePersistence {
    path: PathBuf,
}

impl FilePersistence {
    /// Store under `<dir>/user-store.json`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{STORAGE_KEY}.json")),
        }
    }

    /// Platform data directory, e.g. `~/.local/share/adminkit/user-store.json`.
    pub fn default_location() -> Result<Self, PersistenceError> {
        let base = dirs::data_local_dir()
            .ok_or_else(|| PersistenceError::Unavailable("no local data directory".to_string()))?;
        Ok(Self::in_dir(base.join("adminkit")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionPersistence for FilePersistence {
    fn load(&self) -> Result<Option<Session>, PersistenceError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn save(&self, session: &Session) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write-then-rename so a crash never leaves a truncated document.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(session)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UserProfile;
    use chrono::Utc;

    #[test]
    fn file_round_trip_preserves_session() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FilePersistence::in_dir(dir.path().join("nested"));

        assert!(storage.load().unwrap().is_none());

        let session = Session::authenticated("abc", Some(UserProfile::new(1)), Utc::now());
        storage.save(&session).unwrap();

        assert!(storage.path().ends_with("user-store.json"));
        assert_eq!(storage.load().unwrap(), Some(session));
    }

    #[test]
    fn corrupt_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FilePersistence::in_dir(dir.path());
        fs::write(storage.path(), "{not json").unwrap();

        assert!(matches!(storage.load(), Err(PersistenceError::Serialization(_))));
    }

    #[test]
    fn default_location_is_named_after_the_key() {
        if let Ok(storage) = FilePersistence::default_location() {
            assert!(storage.path().ends_with("adminkit/user-store.json"));
        }
    }

    #[test]
    fn memory_persistence_keeps_serialized_form() {
        let storage = MemoryPersistence::new();
        assert!(storage.load().unwrap().is_none());

        storage.save(&Session::empty()).unwrap();
        let raw = storage.raw().unwrap();
        assert!(raw.contains("\"credential\":\"\""));
    }
}
