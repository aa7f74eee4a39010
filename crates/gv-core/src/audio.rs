//! Audio-guide player state
//!
//! Playback itself belongs to the embedding player; this tracks which
//! artwork's guide is loaded, whether it plays, the minimized flag and the
//! volume.

use parking_lot::RwLock;
use tracing::debug;

use crate::catalog::{Artwork, ArtworkId};

/// Point-in-time view of the player
#[derive(Debug, Clone, PartialEq)]
pub struct AudioGuideSnapshot {
    pub current: Option<Artwork>,
    pub playing: bool,
    pub minimized: bool,
    /// Always within `[0, 1]`
    pub volume: f32,
}

impl Default for AudioGuideSnapshot {
    fn default() -> Self {
        Self {
            current: None,
            playing: false,
            minimized: false,
            volume: 1.0,
        }
    }
}

impl AudioGuideSnapshot {
    pub fn current_id(&self) -> Option<ArtworkId> {
        self.current.as_ref().map(|a| a.id)
    }
}

type AudioListener = Box<dyn Fn(&AudioGuideSnapshot) + Send + Sync>;

/// Shared audio-guide state with change listeners
#[derive(Default)]
pub struct AudioGuideState {
    state: RwLock<AudioGuideSnapshot>,
    listeners: RwLock<Vec<AudioListener>>,
}

impl AudioGuideState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> AudioGuideSnapshot {
        self.state.read().clone()
    }

    pub fn is_playing(&self) -> bool {
        self.state.read().playing
    }

    pub fn volume(&self) -> f32 {
        self.state.read().volume
    }

    /// Load `artwork`'s guide and start playing it
    pub fn play(&self, artwork: &Artwork) {
        debug!("Audio guide playing artwork {}", artwork.id);
        self.modify(|state| {
            state.current = Some(artwork.clone());
            state.playing = true;
        });
    }

    /// Keep the loaded guide, stop playing
    pub fn pause(&self) {
        self.modify(|state| state.playing = false);
    }

    /// Unload the guide
    pub fn stop(&self) {
        self.modify(|state| {
            state.current = None;
            state.playing = false;
        });
    }

    /// Swap the loaded guide without touching the playing flag
    pub fn set_current_artwork(&self, artwork: Option<&Artwork>) {
        self.modify(|state| state.current = artwork.cloned());
    }

    pub fn set_playing(&self, playing: bool) {
        self.modify(|state| state.playing = playing);
    }

    pub fn set_minimized(&self, minimized: bool) {
        self.modify(|state| state.minimized = minimized);
    }

    /// Set the volume, clamped to `[0, 1]`; NaN mutes
    pub fn set_volume(&self, volume: f32) {
        let volume = if volume.is_nan() { 0.0 } else { volume.clamp(0.0, 1.0) };
        self.modify(|state| state.volume = volume);
    }

    /// Register a callback invoked after every change
    pub fn subscribe(&self, listener: impl Fn(&AudioGuideSnapshot) + Send + Sync + 'static) {
        self.listeners.write().push(Box::new(listener));
    }

    fn modify(&self, f: impl FnOnce(&mut AudioGuideSnapshot)) {
        let changed = {
            let mut state = self.state.write();
            let before = state.clone();
            f(&mut state);
            (*state != before).then(|| state.clone())
        };
        if let Some(snapshot) = changed {
            for listener in self.listeners.read().iter() {
                listener(&snapshot);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn artwork(id: ArtworkId) -> Artwork {
        Artwork {
            id,
            title: format!("Guide {}", id),
            artist: "Berthe Morisot".to_string(),
            year: "1879".to_string(),
            medium: "Oil on canvas".to_string(),
            collection: String::new(),
            description: String::new(),
            image_url: String::new(),
            section: "figure".to_string(),
            url: None,
        }
    }

    #[test]
    fn test_play_pause_stop() {
        let audio = AudioGuideState::new();
        assert_eq!(audio.snapshot(), AudioGuideSnapshot::default());

        audio.play(&artwork(7));
        assert!(audio.is_playing());
        assert_eq!(audio.snapshot().current_id(), Some(7));

        audio.pause();
        assert!(!audio.is_playing());
        assert_eq!(audio.snapshot().current_id(), Some(7));

        audio.play(&artwork(9));
        audio.stop();
        let snapshot = audio.snapshot();
        assert_eq!(snapshot.current, None);
        assert!(!snapshot.playing);
    }

    #[test]
    fn test_volume_is_clamped() {
        let audio = AudioGuideState::new();
        assert_eq!(audio.volume(), 1.0);
        audio.set_volume(0.35);
        assert_eq!(audio.volume(), 0.35);
        audio.set_volume(1.8);
        assert_eq!(audio.volume(), 1.0);
        audio.set_volume(-0.2);
        assert_eq!(audio.volume(), 0.0);
        audio.set_volume(0.5);
        audio.set_volume(f32::NAN);
        assert_eq!(audio.volume(), 0.0);
    }

    #[test]
    fn test_minimized_survives_stop() {
        let audio = AudioGuideState::new();
        audio.play(&artwork(2));
        audio.set_minimized(true);
        audio.stop();
        assert!(audio.snapshot().minimized);
    }

    #[test]
    fn test_listeners_see_changes_only() {
        let audio = AudioGuideState::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        audio.subscribe(move |s| sink.lock().push((s.current_id(), s.playing)));

        audio.pause();
        audio.play(&artwork(4));
        audio.play(&artwork(4));
        audio.pause();
        audio.set_volume(1.0);

        assert_eq!(*seen.lock(), vec![(Some(4), true), (Some(4), false)]);
    }
}
