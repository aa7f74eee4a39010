//! Key-value persistence for preference stores

use std::fs;
use std::path::{Path, PathBuf};

use ahash::AHashMap;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::CoreError;

/// Storage a preference store reads from and writes to
pub trait PreferenceBackend: Send + Sync {
    /// Stored value for `key`, if any
    fn load(&self, key: &str) -> Option<Value>;

    /// Persist `value` under `key`
    fn save(&self, key: &str, value: Value) -> Result<(), CoreError>;
}

/// Process-lifetime storage
#[derive(Debug, Default)]
pub struct MemoryBackend {
    values: Mutex<AHashMap<String, Value>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceBackend for MemoryBackend {
    fn load(&self, key: &str) -> Option<Value> {
        self.values.lock().get(key).cloned()
    }

    fn save(&self, key: &str, value: Value) -> Result<(), CoreError> {
        self.values.lock().insert(key.to_string(), value);
        Ok(())
    }
}

/// All preferences in one JSON object file
#[derive(Debug)]
pub struct JsonFileBackend {
    path: PathBuf,
    values: Mutex<Map<String, Value>>,
}

impl JsonFileBackend {
    /// Open the file at `path`. A missing file starts empty; an unreadable
    /// one is logged and treated as empty so the viewer falls back to defaults.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match Self::read(&path) {
            Ok(values) => values,
            Err(e) => {
                warn!("Ignoring unreadable preference file {:?}: {}", path, e);
                Map::new()
            }
        };
        Self {
            path,
            values: Mutex::new(values),
        }
    }

    fn read(path: &Path) -> Result<Map<String, Value>, CoreError> {
        if !path.exists() {
            return Ok(Map::new());
        }
        let contents = fs::read_to_string(path)?;
        if contents.trim().is_empty() {
            return Ok(Map::new());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceBackend for JsonFileBackend {
    fn load(&self, key: &str) -> Option<Value> {
        self.values.lock().get(key).cloned()
    }

    fn save(&self, key: &str, value: Value) -> Result<(), CoreError> {
        let mut values = self.values.lock();
        let mut next = values.clone();
        next.insert(key.to_string(), value);

        // Write to a sibling file first so a crash never leaves a torn file
        let serialized = serde_json::to_vec_pretty(&next)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serialized)?;
        fs::rename(&tmp, &self.path)?;
        *values = next;

        debug!("Saved preference '{}' to {:?}", key, self.path);
        Ok(())
    }
}
