use std::sync::Arc;

use indexmap::IndexSet;
use tracing::debug;

use super::{keys, PreferenceBackend, PreferenceStore};
use crate::catalog::ArtworkId;
use crate::CoreError;

/// Favorite artworks, kept in the order they were added
pub struct FavoritesStore {
    store: PreferenceStore<IndexSet<ArtworkId>>,
}

impl FavoritesStore {
    pub fn open(backend: Arc<dyn PreferenceBackend>) -> Self {
        Self {
            store: PreferenceStore::open(keys::FAVORITES, backend),
        }
    }

    pub fn add(&self, id: ArtworkId) -> Result<(), CoreError> {
        if self.contains(id) {
            return Ok(());
        }
        self.store.update(|ids| {
            ids.insert(id);
        })?;
        Ok(())
    }

    pub fn remove(&self, id: ArtworkId) -> Result<(), CoreError> {
        if !self.contains(id) {
            return Ok(());
        }
        self.store.update(|ids| {
            ids.shift_remove(&id);
        })?;
        Ok(())
    }

    /// Flip membership of `id`; returns whether it is now a favorite
    pub fn toggle(&self, id: ArtworkId) -> Result<bool, CoreError> {
        let mut now_favorite = false;
        self.store.update(|ids| {
            now_favorite = if ids.shift_remove(&id) {
                false
            } else {
                ids.insert(id);
                true
            };
        })?;
        debug!("Artwork {} favorite: {}", id, now_favorite);
        Ok(now_favorite)
    }

    pub fn contains(&self, id: ArtworkId) -> bool {
        self.store.get().contains(&id)
    }

    pub fn ids(&self) -> Vec<ArtworkId> {
        self.store.get().into_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.store.get().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.get().is_empty()
    }

    pub fn clear(&self) -> Result<(), CoreError> {
        self.store.set(IndexSet::new())
    }

    /// Register a callback invoked with the full favorite list on change
    pub fn subscribe(&self, listener: impl Fn(&[ArtworkId]) + Send + Sync + 'static) {
        self.store.subscribe(move |ids| {
            let ids: Vec<ArtworkId> = ids.iter().copied().collect();
            listener(&ids);
        });
    }
}
