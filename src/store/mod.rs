//! Saved-session store
//!
//! All saved sessions live in one JSON array, newest first, in a single file
//! under the data directory. The whole list is read, modified and written
//! back on every change; the write goes to a temp file in the same directory
//! and is renamed over the old blob.

use crate::session::Session;
use chrono::Utc;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, warn};

/// File name of the session blob inside the data directory
pub const STORE_KEY: &str = "pitchTracker.sessions.v1.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("could not encode or decode sessions: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not replace store file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Handle to the persisted session list
#[derive(Clone, Debug)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store rooted at `data_dir`
    pub fn open(data_dir: &Path) -> Self {
        SessionStore {
            path: data_dir.join(STORE_KEY),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every saved session, newest first
    ///
    /// A missing, unreadable or malformed blob reads as an empty list.
    pub fn load(&self) -> Vec<Session> {
        match self.load_strict() {
            Ok(sessions) => sessions,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring unreadable session store");
                Vec::new()
            }
        }
    }

    /// Like `load`, but an existing blob that cannot be read or parsed is an
    /// error. Writers go through this so a bad blob is never overwritten.
    fn load_strict(&self) -> Result<Vec<Session>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    /// Replace the whole list
    pub fn save_all(&self, sessions: &[Session]) -> Result<(), StoreError> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir)?;

        let json = serde_json::to_string(sessions)?;
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)?;

        debug!(path = %self.path.display(), count = sessions.len(), "session store written");
        Ok(())
    }

    /// Snapshot `session` at the front of the list under a fresh id
    ///
    /// The stored copy is independent of `session`; the new id is returned.
    pub fn insert(&self, session: &Session) -> Result<String, StoreError> {
        let saved_id = new_saved_id();
        let mut snapshot = session.clone();
        snapshot.saved_id = Some(saved_id.clone());

        let mut sessions = self.load_strict()?;
        sessions.insert(0, snapshot);
        self.save_all(&sessions)?;
        Ok(saved_id)
    }

    /// Find a saved session by id
    pub fn get(&self, saved_id: &str) -> Option<Session> {
        self.load()
            .into_iter()
            .find(|s| s.saved_id.as_deref() == Some(saved_id))
    }

    /// Remove the first session with `saved_id`; false when none matched
    pub fn delete(&self, saved_id: &str) -> Result<bool, StoreError> {
        let mut sessions = self.load_strict()?;
        let Some(pos) = sessions
            .iter()
            .position(|s| s.saved_id.as_deref() == Some(saved_id))
        else {
            return Ok(false);
        };

        sessions.remove(pos);
        self.save_all(&sessions)?;
        Ok(true)
    }

    /// Drop every saved session
    pub fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// `<unix millis>_<random hex>`
fn new_saved_id() -> String {
    format!("{}_{:x}", Utc::now().timestamp_millis(), rand::random::<u64>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_store_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::open(dir.path());
        assert!(store.load().is_empty());
        assert!(store.clear().is_ok());
    }

    #[test]
    fn test_corrupt_store_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::open(dir.path());

        fs::write(store.path(), "{not json").unwrap();
        assert!(store.load().is_empty());

        fs::write(store.path(), r#"{"name":"object, not array"}"#).unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_insert_is_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::open(dir.path());

        let first = store.insert(&Session::new("first", Utc::now())).unwrap();
        let second = store.insert(&Session::new("second", Utc::now())).unwrap();
        assert_ne!(first, second);

        let sessions = store.load();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].name, "second");
        assert_eq!(sessions[1].saved_id.as_deref(), Some(first.as_str()));
    }

    #[test]
    fn test_writers_leave_corrupt_store_alone() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::open(dir.path());
        let blob = r#"[{"name":"kept","pitches":"not a list"}]"#;
        fs::write(store.path(), blob).unwrap();

        assert!(matches!(
            store.insert(&Session::new("new", Utc::now())),
            Err(StoreError::Json(_))
        ));
        assert!(matches!(store.delete("anything"), Err(StoreError::Json(_))));
        assert_eq!(fs::read_to_string(store.path()).unwrap(), blob);

        store.clear().unwrap();
        assert!(store.insert(&Session::new("new", Utc::now())).is_ok());
    }

    #[test]
    fn test_saved_id_shape() {
        let id = new_saved_id();
        let (millis, suffix) = id.split_once('_').unwrap();
        assert!(millis.parse::<i64>().is_ok());
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
