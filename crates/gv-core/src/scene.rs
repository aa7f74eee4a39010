//! Hotspot layer handed to the 3D scene renderer
//!
//! The renderer itself is out of scope: it receives the hotspot list and the
//! selected id, and reports clicks back by hotspot id.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::ArtworkId;
use crate::CoreError;

pub type HotspotId = String;

/// What a hotspot points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HotspotKind {
    #[default]
    Artwork,
    Info,
    Navigation,
}

/// A labeled marker in the gallery space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotspot {
    pub id: HotspotId,
    #[serde(default)]
    pub kind: HotspotKind,
    pub position: [f32; 3],
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_artwork_id: Option<ArtworkId>,
    /// Camera destination for navigation hotspots
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_position: Option<[f32; 3]>,
}

type SelectionListener = Box<dyn Fn(Option<&Hotspot>) + Send + Sync>;

/// Hotspot list plus the current selection
pub struct HotspotLayer {
    hotspots: Arc<RwLock<Vec<Hotspot>>>,
    selected: Arc<RwLock<Option<HotspotId>>>,
    listeners: RwLock<Vec<SelectionListener>>,
}

impl HotspotLayer {
    pub fn new(hotspots: Vec<Hotspot>) -> Self {
        Self {
            hotspots: Arc::new(RwLock::new(hotspots)),
            selected: Arc::new(RwLock::new(None)),
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Replace the hotspot list; a selection that no longer exists is cleared
    pub fn set_hotspots(&self, hotspots: Vec<Hotspot>) {
        let keep = {
            let selected = self.selected.read();
            selected
                .as_ref()
                .map_or(true, |id| hotspots.iter().any(|h| &h.id == id))
        };
        *self.hotspots.write() = hotspots;
        if !keep {
            self.clear_selection();
        }
    }

    pub fn hotspots(&self) -> Vec<Hotspot> {
        self.hotspots.read().clone()
    }

    pub fn hotspot(&self, id: &str) -> Option<Hotspot> {
        self.hotspots.read().iter().find(|h| h.id == id).cloned()
    }

    pub fn selected_id(&self) -> Option<HotspotId> {
        self.selected.read().clone()
    }

    pub fn selected(&self) -> Option<Hotspot> {
        let id = self.selected_id()?;
        self.hotspot(&id)
    }

    /// Handle a click from the renderer. Selects the hotspot and returns the
    /// artwork it links to, if any.
    pub fn click(&self, id: &str) -> Result<Option<ArtworkId>, CoreError> {
        let hotspot = self
            .hotspot(id)
            .ok_or_else(|| CoreError::UnknownHotspot(id.to_string()))?;

        *self.selected.write() = Some(hotspot.id.clone());
        info!("Hotspot '{}' selected ({})", hotspot.id, hotspot.label);
        self.notify(Some(&hotspot));

        Ok(hotspot.target_artwork_id)
    }

    pub fn clear_selection(&self) {
        let previous = self.selected.write().take();
        if previous.is_some() {
            debug!("Hotspot selection cleared");
            self.notify(None);
        }
    }

    /// Register a callback invoked on every selection change
    pub fn subscribe(&self, listener: impl Fn(Option<&Hotspot>) + Send + Sync + 'static) {
        self.listeners.write().push(Box::new(listener));
    }

    fn notify(&self, hotspot: Option<&Hotspot>) {
        for listener in self.listeners.read().iter() {
            listener(hotspot);
        }
    }
}

impl Default for HotspotLayer {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
