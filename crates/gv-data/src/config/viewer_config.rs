//! Top-level viewer configuration

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use gv_core::feed::DEFAULT_PAGE_SIZE;
use gv_core::viewport::DEFAULT_VISIBILITY_THRESHOLD;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::SearchOptions;
use crate::CatalogError;

/// Configuration for the whole viewer, usually read from a JSON file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub feed: FeedConfig,
    pub search: SearchOptions,
    pub viewport: ViewportConfig,
    pub avatars: AvatarConfig,
}

/// Feed paging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Artworks appended per page
    pub page_size: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Current-item detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Visible ratio an artwork must reach to become current
    pub threshold: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_VISIBILITY_THRESHOLD,
        }
    }
}

/// Artist avatar lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvatarConfig {
    /// Artist name (as it appears in the catalog) to local image path
    pub local: HashMap<String, String>,

    /// Service generating initials avatars for everyone else
    pub fallback_base: String,

    /// Default avatar edge length in pixels
    pub size: u32,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            local: HashMap::new(),
            fallback_base: "https://ui-avatars.com/api/".to_string(),
            size: 80,
        }
    }
}

impl ViewerConfig {
    /// Load and validate a configuration file
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path)?;
        let config: ViewerConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        info!("Loaded viewer configuration from {:?}", path);
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.feed.page_size == 0 {
            return Err(CatalogError::Config("feed.page_size must be at least 1".to_string()));
        }
        if !(0.0..=1.0).contains(&self.search.fuzzy) {
            return Err(CatalogError::Config(format!(
                "search.fuzzy must be within 0..=1, got {}",
                self.search.fuzzy
            )));
        }
        if !(self.viewport.threshold > 0.0 && self.viewport.threshold <= 1.0) {
            return Err(CatalogError::Config(format!(
                "viewport.threshold must be within (0, 1], got {}",
                self.viewport.threshold
            )));
        }
        if self.avatars.size == 0 {
            return Err(CatalogError::Config("avatars.size must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ViewerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.feed.page_size, 10);
        assert_eq!(config.viewport.threshold, 0.5);
        assert_eq!(config.avatars.size, 80);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viewer.json");
        fs::write(
            &path,
            r#"{"feed": {"page_size": 12}, "avatars": {"local": {"Paul Cézanne": "/avatars/cezanne.jpg"}}}"#,
        )
        .unwrap();

        let config = ViewerConfig::from_path(&path).unwrap();
        assert_eq!(config.feed.page_size, 12);
        assert_eq!(config.search, SearchOptions::default());
        assert_eq!(config.avatars.local.len(), 1);
        assert_eq!(config.avatars.fallback_base, "https://ui-avatars.com/api/");
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = ViewerConfig::default();
        config.feed.page_size = 0;
        assert!(matches!(config.validate(), Err(CatalogError::Config(_))));

        let mut config = ViewerConfig::default();
        config.search.fuzzy = 1.5;
        assert!(config.validate().is_err());

        let mut config = ViewerConfig::default();
        config.viewport.threshold = 0.0;
        assert!(config.validate().is_err());
    }
}
