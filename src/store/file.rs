use std::collections::HashMap;
use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::RwLock;

use log::warn;

use super::{KvStore, StoreError};

/// Environment variable naming the store file, for hosts that configure the
/// widget through the environment.
pub const STORE_PATH_ENV: &str = "FOOD_POLL_DB";

const DEFAULT_STORE_PATH: &str = "food_poll.json";

/// Single-file key-value store: the whole key space is one JSON object,
/// read once at open and rewritten after every set. Suits the handful of
/// polls a device actually holds.
pub struct FileStore {
    path: PathBuf,
    data: RwLock<HashMap<String, String>>,
}

impl FileStore {
    /// Opens (or creates) the store file, creating parent directories as
    /// needed. A file that is not valid JSON is treated as empty after a
    /// warning; per-record recovery is the poll store's job.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let data = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(
                    "Store file {} is not valid JSON ({}); starting empty",
                    path.display(),
                    e
                );
                HashMap::new()
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(StoreError::Io(e)),
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    /// Opens the store at the path named by `FOOD_POLL_DB`, defaulting to
    /// `food_poll.json` in the working directory.
    pub fn from_env() -> Result<Self, StoreError> {
        let path = env::var(STORE_PATH_ENV).unwrap_or_else(|_| DEFAULT_STORE_PATH.to_string());
        Self::open(path)
    }

    fn flush(&self, data: &HashMap<String, String>) -> Result<(), StoreError> {
        let raw =
            serde_json::to_string(data).map_err(|e| StoreError::Unavailable(e.to_string()))?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let data = self
            .data
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        Ok(data.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut data = self
            .data
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        data.insert(key.to_string(), value.to_string());
        self.flush(&data)
    }
}
