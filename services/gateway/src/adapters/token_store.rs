//! services/gateway/src/adapters/token_store.rs
//!
//! Implementations of the `TokenStore` port: one persisted to disk under the
//! fixed `auth_token` key, one kept in memory.

use medisearch_core::ports::{PortError, PortResult, TokenStore, TOKEN_KEY};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

//=========================================================================================
// File-backed Store
//=========================================================================================

/// Keeps the token in `<dir>/auth_token` so it survives restarts.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(TOKEN_KEY),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> PortResult<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PortError::Storage(format!("reading {}: {}", self.path.display(), e))),
        }
    }

    fn save(&self, token: &str) -> PortResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| PortError::Storage(format!("creating {}: {}", parent.display(), e)))?;
        }
        std::fs::write(&self.path, token)
            .map_err(|e| PortError::Storage(format!("writing {}: {}", self.path.display(), e)))
    }

    fn clear(&self) -> PortResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PortError::Storage(format!("removing {}: {}", self.path.display(), e))),
        }
    }
}

//=========================================================================================
// In-memory Store
//=========================================================================================

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> PortResult<Option<String>> {
        self.token
            .read()
            .map(|token| token.clone())
            .map_err(|_| PortError::Storage("token lock poisoned".to_string()))
    }

    fn save(&self, token: &str) -> PortResult<()> {
        let mut slot = self
            .token
            .write()
            .map_err(|_| PortError::Storage("token lock poisoned".to_string()))?;
        *slot = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> PortResult<()> {
        let mut slot = self
            .token
            .write()
            .map_err(|_| PortError::Storage("token lock poisoned".to_string()))?;
        *slot = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("medisearch-token-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn file_store_round_trips_and_survives_reopen() {
        let dir = scratch_dir();
        let store = FileTokenStore::new(&dir);
        assert_eq!(store.load().unwrap(), None);

        store.save("abc.def").unwrap();
        assert!(store.path().ends_with("auth_token"));

        let reopened = FileTokenStore::new(&dir);
        assert_eq!(reopened.load().unwrap().as_deref(), Some("abc.def"));

        reopened.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn clearing_an_absent_token_is_fine() {
        let store = FileTokenStore::new(scratch_dir());
        store.clear().unwrap();
    }

    #[test]
    fn memory_store_replaces_and_clears() {
        let store = MemoryTokenStore::new();
        store.save("one").unwrap();
        store.save("two").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("two"));
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }
}
