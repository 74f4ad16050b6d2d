use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::AuthError;
use super::token::{TokenPair, TokenUpdate};

/// Storage abstraction for the persisted token pair.
///
/// Implementations must keep the pair consistent: `load` never observes an
/// access token from one `save` combined with a refresh token from another.
pub trait TokenStore: Send + Sync {
    /// Read both secrets. Nothing persisted is an empty pair, not an error.
    fn load(&self) -> Result<TokenPair, AuthError>;
    /// Apply a partial update; fields the update does not name are kept.
    fn save(&self, update: &TokenUpdate) -> Result<(), AuthError>;
    /// Delete both secrets unconditionally (logout).
    fn clear(&self) -> Result<(), AuthError>;
}

/// Configuration for file-backed credential storage.
#[derive(Debug, Clone)]
pub struct TokenStoreConfig {
    pub base_dir: PathBuf,
}

impl TokenStoreConfig {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn default_dir() -> PathBuf {
        default_mindwell_dir()
    }
}

/// File-backed token store using a single TOML credentials file.
///
/// Both secrets live in one file written as a unit, so the pair can never be
/// observed half-updated. The file is created owner-readable only.
///
/// # Example
/// ```no_run
/// use mindwell_api::auth::{FileTokenStore, TokenStore, TokenUpdate};
///
/// let store = FileTokenStore::new_default();
/// store.save(&TokenUpdate::new().access_token(Some("access")))?;
/// # Ok::<(), mindwell_api::auth::AuthError>(())
/// ```
#[derive(Debug)]
pub struct FileTokenStore {
    base_dir: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

const CREDENTIALS_FILE: &str = "credentials.toml";

impl FileTokenStore {
    pub fn new(config: TokenStoreConfig) -> Self {
        Self {
            base_dir: config.base_dir,
            write_lock: Mutex::new(()),
        }
    }

    pub fn new_default() -> Self {
        Self::new(TokenStoreConfig::new(default_mindwell_dir()))
    }

    fn credentials_path(&self) -> PathBuf {
        self.base_dir.join(CREDENTIALS_FILE)
    }

    fn ensure_parent(path: &Path) -> Result<(), AuthError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    fn read_pair(&self) -> Result<TokenPair, AuthError> {
        let path = self.credentials_path();
        let raw = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(TokenPair::default())
            }
            Err(err) => return Err(AuthError::Io(err.to_string())),
        };
        let file: CredentialsFile = toml::from_str(&raw)?;
        Ok(file.tokens)
    }

    fn write_pair(&self, pair: &TokenPair) -> Result<(), AuthError> {
        let path = self.credentials_path();
        Self::ensure_parent(&path)?;
        let file = CredentialsFile {
            version: 1,
            tokens: pair.clone(),
            saved_at: Utc::now(),
        };
        let serialized = toml::to_string(&file)?;
        fs::write(&path, serialized)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<TokenPair, AuthError> {
        let _guard = lock(&self.write_lock);
        self.read_pair()
    }

    fn save(&self, update: &TokenUpdate) -> Result<(), AuthError> {
        let _guard = lock(&self.write_lock);
        let mut pair = self.read_pair()?;
        update.apply(&mut pair);
        self.write_pair(&pair)
    }

    fn clear(&self) -> Result<(), AuthError> {
        let _guard = lock(&self.write_lock);
        match fs::remove_file(self.credentials_path()) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AuthError::Io(err.to_string())),
        }
    }
}

fn lock(mutex: &Mutex<()>) -> std::sync::MutexGuard<'_, ()> {
    // A poisoned guard only means another thread panicked mid-write; the
    // file itself is still the source of truth.
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CredentialsFile {
    version: u32,
    tokens: TokenPair,
    saved_at: DateTime<Utc>,
}

fn default_mindwell_dir() -> PathBuf {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().join(".mindwell"))
        .unwrap_or_else(|| PathBuf::from(".mindwell"))
}
