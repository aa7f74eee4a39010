//! Catalog loading, lookup, filtering and search for the exhibition viewer

pub mod cache;
pub mod catalog;
pub mod config;
pub mod index;
pub mod query;
pub mod sources;

use gv_core::ArtworkId;
use thiserror::Error;
use tokio::task::JoinError;

// Re-exports
pub use cache::SearchIndexCache;
pub use catalog::Catalog;
pub use config::ViewerConfig;
pub use index::{SearchHit, SearchIndex};
pub use query::{filter_artworks, sort_artworks, year_token, FilterOptions, SortOption};
pub use sources::{load_catalog, EmbeddedSource, JsonFileSource};

/// Errors that can occur while loading or validating a catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate artwork id {0}")]
    DuplicateArtwork(ArtworkId),

    #[error("Artwork id must be positive")]
    ZeroArtworkId,

    #[error("Artwork {artwork} references unknown section '{section}'")]
    UnknownSection { artwork: ArtworkId, section: String },

    #[error("Section '{section}' lists unknown artwork {artwork}")]
    UnknownMember { section: String, artwork: ArtworkId },

    #[error("Duplicate section id '{0}'")]
    DuplicateSection(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Join error: {0}")]
    Join(#[from] JoinError),
}
