//! Core functionality for the exhibition viewer
//!
//! This crate provides the catalog data model and the state engines the
//! viewer is assembled from: the incremental feed window, viewport tracking,
//! preference stores, audio-guide state and the hotspot layer handed to the scene renderer.

pub mod audio;
pub mod catalog;
pub mod events;
pub mod feed;
pub mod prefs;
pub mod scene;
pub mod viewport;

mod error;

// Re-export commonly used types
pub use audio::{AudioGuideSnapshot, AudioGuideState};
pub use catalog::{Artwork, ArtworkId, ExhibitionData, Section};
pub use error::CoreError;
pub use events::EventBus;
pub use feed::{FeedController, FeedSnapshot, FeedState, FeedSubscriber, JumpOutcome, LoadOutcome};
pub use prefs::{FavoritesStore, FontSize, PreferenceBackend, PreferenceStore, Preferences, Theme, ViewMode};
pub use scene::{Hotspot, HotspotId, HotspotKind, HotspotLayer};
pub use viewport::{CurrentItemSubscriber, ViewportTracker, VisibilityReport};
pub use data::CatalogSource;

pub mod data {
    use crate::catalog::ExhibitionData;

    /// Trait for static catalog sources
    #[async_trait::async_trait]
    pub trait CatalogSource: Send + Sync {
        /// Load the full exhibition document
        async fn load(&self) -> anyhow::Result<ExhibitionData>;

        /// Get the source name/path
        fn source_name(&self) -> &str;
    }
}
