// ABOUTME: Durable persistence for the user token
// ABOUTME: A TOML file with a single `token` key, plus an in-memory store for tests and scripting

use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::error::{AuthError, AuthResult};

/// Synchronous storage for exactly one durable token. Last write wins.
pub trait TokenPersistence: Send {
    fn load(&self) -> AuthResult<Option<String>>;
    fn save(&self, token: &str) -> AuthResult<()>;
    fn clear(&self) -> AuthResult<()>;
}

#[derive(Debug, Serialize, Deserialize)]
struct CredentialFile {
    token: String,
}

/// Token stored on disk, e.g. `~/.modview/credentials.toml`
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenPersistence for FileTokenStore {
    fn load(&self) -> AuthResult<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        let file: CredentialFile =
            toml::from_str(&content).map_err(|e| AuthError::Format(e.to_string()))?;

        let token = file.token.trim().to_string();
        Ok((!token.is_empty()).then_some(token))
    }

    fn save(&self, token: &str) -> AuthResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(&CredentialFile {
            token: token.to_string(),
        })
        .map_err(|e| AuthError::Storage(format!("Failed to serialize token: {}", e)))?;

        let mut file = open_private(&self.path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;

        debug!("Saved user token to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> AuthResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Open the credential file for writing. A new file is created owner-only;
/// an existing one is narrowed to 0600 before any token bytes are written.
#[cfg(unix)]
fn open_private(path: &Path) -> AuthResult<File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    Ok(file)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> AuthResult<File> {
    Ok(OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?)
}

/// Token kept in memory only. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    slot: Arc<Mutex<Option<String>>>,
    writes: Arc<AtomicUsize>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let store = Self::new();
        *store.lock() = Some(token.into());
        store
    }

    /// Number of save/clear calls observed
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn stored(&self) -> Option<String> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TokenPersistence for MemoryTokenStore {
    fn load(&self) -> AuthResult<Option<String>> {
        Ok(self.stored())
    }

    fn save(&self, token: &str) -> AuthResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        *self.lock() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> AuthResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        *self.lock() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileTokenStore::new(temp_dir.path().join("nested/credentials.toml"));

        assert_eq!(store.load().unwrap(), None);

        store.save("abc123").unwrap();
        assert_eq!(store.load().unwrap(), Some("abc123".to_string()));

        store.save("def456").unwrap();
        assert_eq!(store.load().unwrap(), Some("def456".to_string()));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        // Clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_file_store_rejects_garbage() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("credentials.toml");
        fs::write(&path, "this is = = not toml").unwrap();

        let err = FileTokenStore::new(&path).load().unwrap_err();
        assert!(matches!(err, AuthError::Format(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let store = FileTokenStore::new(temp_dir.path().join("credentials.toml"));
        store.save("abc123").unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_narrows_existing_file() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("credentials.toml");
        fs::write(&path, "token = \"old\"\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let store = FileTokenStore::new(&path);
        store.save("abc123").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(store.load().unwrap(), Some("abc123".to_string()));
    }

    #[test]
    fn test_memory_store_counts_writes() {
        let store = MemoryTokenStore::new();
        let shared = store.clone();

        store.save("abc").unwrap();
        assert_eq!(shared.stored(), Some("abc".to_string()));
        assert_eq!(shared.writes(), 1);
    }
}
