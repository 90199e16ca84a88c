use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use log::{debug, warn};

use crate::error::StoreError;
use crate::model::RememberableItem;

/// Durable string key-value storage scoped to one application.
///
/// Implementations must make each `set`/`remove` atomic for its key; nothing
/// spans multiple keys.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// # Errors
    /// Returns an error when the value could not be made durable.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// # Errors
    /// Returns an error when the removal could not be made durable.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Process-local store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

/// Store persisted as a flat JSON object, rewritten atomically on every
/// mutation.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: Mutex<HashMap<String, String>>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing or unreadable file starts empty;
    /// the file is only created on the first write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = load_from_path(&path).unwrap_or_default();
        Self {
            path,
            values: Mutex::new(values),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, values: &HashMap<String, String>) -> Result<(), StoreError> {
        let data = serde_json::to_vec_pretty(values).map_err(StoreError::Encode)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        write_atomic(&self.path, &data)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value.to_string());
        self.persist(&values)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        if values.remove(key).is_none() {
            return Ok(());
        }
        self.persist(&values)
    }
}

fn load_from_path(path: &Path) -> Option<HashMap<String, String>> {
    let data = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&data) {
        Ok(values) => Some(values),
        Err(error) => {
            debug!(
                "Ignoring unreadable dismissal memory at {}: {error}",
                path.display()
            );
            None
        }
    }
}

/// Replace `path` with `data` through a sibling temp file, so readers see the
/// old contents or the new ones and never a partial write.
fn write_atomic(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = tempfile::NamedTempFile::new_in(dir)?;
    staged.write_all(data)?;
    staged.as_file().sync_all()?;
    staged.persist(path).map_err(|error| error.error)?;
    Ok(())
}

/// Records which gate messages the user has already dismissed.
///
/// Persistence failures are logged and swallowed: a failed write only means
/// the message may be shown again on a later launch.
#[derive(Clone)]
pub struct DismissalMemory {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for DismissalMemory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DismissalMemory").finish_non_exhaustive()
    }
}

impl DismissalMemory {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    #[must_use]
    pub fn from_shared(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(InMemoryStore::new())
    }

    pub fn remember(&self, item: &impl RememberableItem) {
        let key = item.remember_key();
        if let Err(error) = self.store.set(key, item.remember_string()) {
            warn!("Failed to persist dismissal for `{key}`: {error}");
        }
    }

    pub fn forget(&self, item: &impl RememberableItem) {
        self.forget_key(item.remember_key());
    }

    /// Clear a slot without needing the message that occupies it.
    pub fn forget_key(&self, key: &str) {
        if let Err(error) = self.store.remove(key) {
            warn!("Failed to clear dismissal for `{key}`: {error}");
        }
    }

    #[must_use]
    pub fn contains(&self, item: &impl RememberableItem) -> bool {
        self.store
            .get(item.remember_key())
            .is_some_and(|stored| stored == item.remember_string())
    }

    #[must_use]
    pub fn stored(&self, key: &str) -> Option<String> {
        self.store.get(key)
    }
}
