//! JSON-file-backed key-value store

use std::{
    collections::HashMap,
    fs,
    io::ErrorKind,
    path::PathBuf,
    sync::Mutex,
};
use tracing::{debug, info, warn};

use super::KvStore;

/// Key-value store persisted as a single JSON object file
///
/// Entries are cached in memory and the whole map is flushed back to the
/// file on every write.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Open a store backed by `path`, loading any existing entries.
    ///
    /// A missing file starts the store empty; an unreadable or corrupt file
    /// is logged and also starts the store empty. Opening never fails.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<HashMap<String, String>>(&contents) {
                Ok(entries) => {
                    debug!("Loaded {} entries from {}", entries.len(), path.display());
                    entries
                }
                Err(e) => {
                    warn!("Store file {} is corrupt ({}), starting empty", path.display(), e);
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("Store file {} not found, starting empty", path.display());
                HashMap::new()
            }
            Err(e) => {
                warn!("Failed to read store file {}: {}, starting empty", path.display(), e);
                HashMap::new()
            }
        };

        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    /// Write the full entry map back to the backing file
    fn flush(&self, entries: &HashMap<String, String>) -> Result<(), String> {
        let contents = serde_json::to_string_pretty(entries)
            .map_err(|e| format!("Failed to serialize store entries: {}", e))?;

        fs::write(&self.path, contents)
            .map_err(|e| format!("Failed to write store file {}: {}", self.path.display(), e))
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, String> {
        let entries = self.entries.lock()
            .map_err(|e| format!("Failed to lock store entries: {}", e))?;

        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        let mut entries = self.entries.lock()
            .map_err(|e| format!("Failed to lock store entries: {}", e))?;

        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries)
    }
}
