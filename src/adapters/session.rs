use crate::domain::model::Session;
use crate::domain::ports::SessionStore;
use crate::utils::error::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// 以 JSON 檔保存登入狀態
#[derive(Debug, Clone)]
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
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let data = fs::read(&self.path)?;
        match serde_json::from_slice::<Session>(&data) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                // 檔案損毀時視為未登入
                tracing::warn!(
                    "Ignoring unreadable session file {}: {}",
                    self.path.display(),
                    e
                );
                Ok(None)
            }
        }
    }

    fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let data = serde_json::to_vec_pretty(session)?;
        fs::write(&self.path, data)?;
        tracing::debug!("Session saved to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    inner: Arc<Mutex<Option<Session>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Some(session))),
        }
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self::with_session(Session {
            token: token.into(),
            user: None,
        })
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>> {
        let guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        Ok(guard.clone())
    }

    fn save(&self, session: &Session) -> Result<()> {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        *guard = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        *guard = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn session(token: &str) -> Session {
        Session {
            token: token.to_string(),
            user: None,
        }
    }

    #[test]
    fn test_file_store_round_trip_and_clear() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(temp_dir.path().join("nested/session.json"));

        assert_eq!(store.load().unwrap(), None);
        store.save(&session("abc")).unwrap();
        assert_eq!(store.load().unwrap().unwrap().token, "abc");

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        // clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_file_store_treats_corrupt_file_as_logged_out() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");
        std::fs::write(&path, b"{not json").unwrap();

        let store = FileSessionStore::new(path);
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_memory_store_clones_share_state() {
        let store = MemorySessionStore::with_token("t1");
        let other = store.clone();
        other.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }
}
