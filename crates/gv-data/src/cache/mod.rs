//! Search index caching

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::config::SearchOptions;
use crate::index::SearchIndex;

/// Lazily built search index, reused while the catalog snapshot stays the
/// same and rebuilt when a different snapshot is asked for
pub struct SearchIndexCache {
    options: SearchOptions,
    entry: Arc<RwLock<Option<(Uuid, Arc<SearchIndex>)>>>,
}

impl SearchIndexCache {
    pub fn new(options: SearchOptions) -> Self {
        Self {
            options,
            entry: Arc::new(RwLock::new(None)),
        }
    }

    /// Index for `catalog`, building it on first use
    pub fn get_or_build(&self, catalog: &Catalog) -> Arc<SearchIndex> {
        let snapshot = catalog.snapshot_id();

        if let Some((cached, index)) = self.entry.read().as_ref() {
            if *cached == snapshot {
                debug!("Reusing search index for snapshot {}", snapshot);
                return Arc::clone(index);
            }
        }

        let mut entry = self.entry.write();
        // another caller may have built it while we waited for the lock
        if let Some((cached, index)) = entry.as_ref() {
            if *cached == snapshot {
                return Arc::clone(index);
            }
        }

        let index = Arc::new(SearchIndex::build(catalog.artworks(), self.options.clone()));
        info!(
            "Built search index for snapshot {}: {} artworks, {} terms",
            snapshot,
            index.len(),
            index.term_count()
        );
        *entry = Some((snapshot, Arc::clone(&index)));
        index
    }

    /// Whether an index for `catalog` is already built
    pub fn is_cached(&self, catalog: &Catalog) -> bool {
        matches!(self.entry.read().as_ref(), Some((id, _)) if *id == catalog.snapshot_id())
    }

    pub fn clear(&self) {
        self.entry.write().take();
    }
}

impl Default for SearchIndexCache {
    fn default() -> Self {
        Self::new(SearchOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gv_core::{Artwork, ExhibitionData};

    fn catalog(title: &str) -> Catalog {
        Catalog::new(ExhibitionData {
            artworks: vec![Artwork {
                id: 1,
                title: title.to_string(),
                artist: "Camille Pissarro".to_string(),
                year: "1897".to_string(),
                medium: "Oil on canvas".to_string(),
                collection: String::new(),
                description: String::new(),
                image_url: String::new(),
                section: "city".to_string(),
                url: None,
            }],
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_index_reused_for_same_snapshot() {
        let cache = SearchIndexCache::default();
        let catalog = catalog("Boulevard Montmartre");
        assert!(!cache.is_cached(&catalog));

        let first = cache.get_or_build(&catalog);
        let second = cache.get_or_build(&catalog.clone());
        assert!(Arc::ptr_eq(&first, &second));
        assert!(cache.is_cached(&catalog));
    }

    #[test]
    fn test_rebuilt_for_new_snapshot() {
        let cache = SearchIndexCache::default();
        let old = catalog("Boulevard Montmartre");
        let first = cache.get_or_build(&old);

        let new = catalog("Avenue de l'Opéra");
        let second = cache.get_or_build(&new);
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.search("opera").len(), 1);
        assert!(!cache.is_cached(&old));

        cache.clear();
        assert!(!cache.is_cached(&new));
    }
}
