use std::sync::Arc;

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use super::PreferenceBackend;
use crate::CoreError;

type Listener<T> = Box<dyn Fn(&T) + Send + Sync>;

/// A single persisted preference value
pub struct PreferenceStore<T> {
    key: &'static str,
    value: RwLock<T>,
    backend: Arc<dyn PreferenceBackend>,
    listeners: RwLock<Vec<Listener<T>>>,
}

impl<T> PreferenceStore<T>
where
    T: Clone + Default + Serialize + DeserializeOwned + Send + Sync,
{
    /// Load `key` from `backend`, falling back to the default value when it
    /// is missing or no longer decodes.
    pub fn open(key: &'static str, backend: Arc<dyn PreferenceBackend>) -> Self {
        let value = match backend.load(key) {
            Some(raw) => serde_json::from_value(raw).unwrap_or_else(|e| {
                warn!("Stored preference '{}' is invalid, using default: {}", key, e);
                T::default()
            }),
            None => T::default(),
        };

        Self {
            key,
            value: RwLock::new(value),
            backend,
            listeners: RwLock::new(Vec::new()),
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Replace the value, persist it and notify listeners
    pub fn set(&self, value: T) -> Result<(), CoreError> {
        self.update(|current| *current = value).map(|_| ())
    }

    /// Mutate the value, persist it and notify listeners.
    ///
    /// The in-memory value only changes once the backend accepted the write;
    /// on error the previous value stays.
    pub fn update(&self, f: impl FnOnce(&mut T)) -> Result<T, CoreError> {
        let updated = {
            let mut value = self.value.write();
            let mut next = value.clone();
            f(&mut next);
            // Saved under the write lock so concurrent updates persist in order
            self.backend.save(self.key, serde_json::to_value(&next)?)?;
            *value = next.clone();
            next
        };

        for listener in self.listeners.read().iter() {
            listener(&updated);
        }
        Ok(updated)
    }

    /// Register a callback invoked with every new value
    pub fn subscribe(&self, listener: impl Fn(&T) + Send + Sync + 'static) {
        self.listeners.write().push(Box::new(listener));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::{FontSize, MemoryBackend};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_set_persists_and_notifies() {
        let backend = Arc::new(MemoryBackend::new());
        let store: PreferenceStore<FontSize> = PreferenceStore::open("font-size-storage", backend.clone());

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        store.subscribe(move |size| {
            assert_eq!(*size, FontSize::Small);
            counter.fetch_add(1, Ordering::SeqCst);
        });

        store.set(FontSize::Small).unwrap();
        assert_eq!(store.get(), FontSize::Small);
        assert_eq!(backend.load("font-size-storage"), Some(json!("small")));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    struct FailingBackend;

    impl PreferenceBackend for FailingBackend {
        fn load(&self, _key: &str) -> Option<serde_json::Value> {
            None
        }

        fn save(&self, _key: &str, _value: serde_json::Value) -> Result<(), CoreError> {
            Err(CoreError::Io(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only")))
        }
    }

    #[test]
    fn test_failed_save_keeps_previous_value() {
        let store: PreferenceStore<FontSize> = PreferenceStore::open("font-size-storage", Arc::new(FailingBackend));

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(store.set(FontSize::Large).is_err());
        assert_eq!(store.get(), FontSize::Medium);
        assert!(store.update(|size| *size = FontSize::Small).is_err());
        assert_eq!(store.get(), FontSize::Medium);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_concurrent_updates_persist_last_value() {
        let backend = Arc::new(MemoryBackend::new());
        let store: Arc<PreferenceStore<u32>> = Arc::new(PreferenceStore::open("counter", backend.clone()));

        let workers: Vec<_> = (0..4)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        store.update(|n| *n += 1).unwrap();
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(store.get(), 200);
        assert_eq!(backend.load("counter"), Some(json!(200)));
    }

    #[test]
    fn test_invalid_stored_value_uses_default() {
        let backend = Arc::new(MemoryBackend::new());
        backend.save("font-size-storage", json!("enormous")).unwrap();
        let store: PreferenceStore<FontSize> = PreferenceStore::open("font-size-storage", backend);
        assert_eq!(store.get(), FontSize::Medium);
    }
}
