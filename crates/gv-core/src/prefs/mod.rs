//! User preference stores
//!
//! Each preference is an independent store with read/write/subscribe
//! operations, persisted through an injected [`PreferenceBackend`]. The
//! [`Preferences`] container bundles the stores the viewer uses.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

mod backend;
mod favorites;
mod store;

pub use backend::{JsonFileBackend, MemoryBackend, PreferenceBackend};
pub use favorites::FavoritesStore;
pub use store::PreferenceStore;

/// Storage keys, kept stable across releases
pub mod keys {
    pub const FAVORITES: &str = "exhibition-favorites";
    pub const FONT_SIZE: &str = "font-size-storage";
    pub const THEME: &str = "theme-storage";
    pub const VIEW_MODE: &str = "view-mode";
}

/// Reading font size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl FontSize {
    /// Text scale relative to the medium size
    pub fn scale(self) -> f32 {
        match self {
            FontSize::Small => 0.875,
            FontSize::Medium => 1.0,
            FontSize::Large => 1.125,
        }
    }

    /// Heading scale relative to body text at the medium size
    pub fn heading_scale(self) -> f32 {
        match self {
            FontSize::Small => 1.5,
            FontSize::Medium => 2.25,
            FontSize::Large => 3.0,
        }
    }
}

/// Color theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }
}

/// Catalog layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl PreferenceStore<Theme> {
    /// Flip between light and dark, returning the new theme
    pub fn toggle(&self) -> Result<Theme, crate::CoreError> {
        self.update(|theme| *theme = theme.toggled())
    }
}

pub type FontSizeStore = PreferenceStore<FontSize>;
pub type ThemeStore = PreferenceStore<Theme>;
pub type ViewModeStore = PreferenceStore<ViewMode>;

/// All persisted viewer preferences
pub struct Preferences {
    pub favorites: FavoritesStore,
    pub font_size: FontSizeStore,
    pub theme: ThemeStore,
    pub view_mode: ViewModeStore,
}

impl Preferences {
    /// Open every store against the same backend
    pub fn open(backend: Arc<dyn PreferenceBackend>) -> Self {
        Self {
            favorites: FavoritesStore::open(backend.clone()),
            font_size: PreferenceStore::open(keys::FONT_SIZE, backend.clone()),
            theme: PreferenceStore::open(keys::THEME, backend.clone()),
            view_mode: PreferenceStore::open(keys::VIEW_MODE, backend),
        }
    }

    /// Preferences that live only for the process lifetime
    pub fn in_memory() -> Self {
        Self::open(Arc::new(MemoryBackend::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let prefs = Preferences::in_memory();
        assert_eq!(prefs.font_size.get(), FontSize::Medium);
        assert_eq!(prefs.theme.get(), Theme::Light);
        assert_eq!(prefs.view_mode.get(), ViewMode::Grid);
        assert!(prefs.favorites.ids().is_empty());
    }

    #[test]
    fn test_theme_toggle() {
        let prefs = Preferences::in_memory();
        assert_eq!(prefs.theme.toggle().unwrap(), Theme::Dark);
        assert!(prefs.theme.get().is_dark());
        assert_eq!(prefs.theme.toggle().unwrap(), Theme::Light);
    }

    #[test]
    fn test_stores_share_backend() {
        let backend: Arc<dyn PreferenceBackend> = Arc::new(MemoryBackend::new());
        {
            let prefs = Preferences::open(backend.clone());
            prefs.font_size.set(FontSize::Large).unwrap();
            prefs.view_mode.set(ViewMode::List).unwrap();
            prefs.favorites.toggle(12).unwrap();
        }

        let reopened = Preferences::open(backend);
        assert_eq!(reopened.font_size.get(), FontSize::Large);
        assert_eq!(reopened.view_mode.get(), ViewMode::List);
        assert!(reopened.favorites.contains(12));
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&FontSize::Small).unwrap(), "\"small\"");
        assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"dark\"");
        assert_eq!(serde_json::to_string(&ViewMode::List).unwrap(), "\"list\"");
    }
}
