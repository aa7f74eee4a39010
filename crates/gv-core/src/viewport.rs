//! Viewport tracking
//!
//! The rendering layer reports how much of each rendered artwork is visible.
//! An artwork whose visible ratio rises across the threshold becomes the
//! "current" artwork, which drives menu highlighting and timeline sync.
//! When several artworks cross in the same batch, the topmost one in display
//! order wins.

use std::sync::{Arc, Weak};

use ahash::AHashMap;
use parking_lot::RwLock;
use tracing::debug;

use crate::catalog::ArtworkId;

/// Default visible ratio an artwork must reach to become current
pub const DEFAULT_VISIBILITY_THRESHOLD: f32 = 0.5;

/// One observation from the rendering layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityReport {
    pub artwork_id: ArtworkId,
    /// Fraction of the element inside the viewport, 0.0 to 1.0
    pub visible_ratio: f32,
}

impl VisibilityReport {
    pub fn new(artwork_id: ArtworkId, visible_ratio: f32) -> Self {
        Self { artwork_id, visible_ratio }
    }
}

/// Trait for components following the current artwork
pub trait CurrentItemSubscriber: Send + Sync {
    fn on_current_change(&self, artwork_id: ArtworkId);
}

#[derive(Debug, Default)]
struct TrackerState {
    ratios: AHashMap<ArtworkId, f32>,
    /// Display position of each rendered artwork
    order: AHashMap<ArtworkId, usize>,
    current: Option<ArtworkId>,
}

/// Tracks the most visible artwork of the rendered feed
pub struct ViewportTracker {
    threshold: f32,
    state: RwLock<TrackerState>,
    subscribers: RwLock<Vec<Weak<dyn CurrentItemSubscriber>>>,
}

impl ViewportTracker {
    pub fn new(threshold: f32) -> Self {
        let threshold = if threshold.is_finite() {
            threshold.clamp(f32::EPSILON, 1.0)
        } else {
            DEFAULT_VISIBILITY_THRESHOLD
        };
        Self {
            threshold,
            state: RwLock::new(TrackerState::default()),
            subscribers: RwLock::new(Vec::new()),
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Record the display order of rendered artworks, used for tie-breaks
    pub fn set_order(&self, ids: &[ArtworkId]) {
        let mut state = self.state.write();
        state.order = ids.iter().enumerate().map(|(idx, id)| (*id, idx)).collect();
    }

    /// Process a batch of visibility observations. Returns the new current
    /// artwork when it changed.
    pub fn report(&self, batch: &[VisibilityReport]) -> Option<ArtworkId> {
        let mut state = self.state.write();

        let mut winner: Option<(usize, usize, ArtworkId)> = None;
        for (batch_idx, report) in batch.iter().enumerate() {
            let ratio = if report.visible_ratio.is_nan() {
                0.0
            } else {
                report.visible_ratio.clamp(0.0, 1.0)
            };
            let previous = state.ratios.insert(report.artwork_id, ratio).unwrap_or(0.0);

            if previous < self.threshold && ratio >= self.threshold {
                let rank = state.order.get(&report.artwork_id).copied().unwrap_or(usize::MAX);
                let candidate = (rank, batch_idx, report.artwork_id);
                if winner.map_or(true, |best| (candidate.0, candidate.1) < (best.0, best.1)) {
                    winner = Some(candidate);
                }
            }
        }

        let (_, _, id) = winner?;
        if state.current == Some(id) {
            return None;
        }
        state.current = Some(id);
        drop(state);

        debug!("Current artwork is now {}", id);
        self.notify_subscribers(id);
        Some(id)
    }

    /// Forget an element that is no longer rendered
    pub fn remove(&self, id: ArtworkId) {
        let mut state = self.state.write();
        state.ratios.remove(&id);
        state.order.remove(&id);
    }

    /// Clear all observations, used when the feed resets
    pub fn reset(&self) {
        *self.state.write() = TrackerState::default();
    }

    pub fn current(&self) -> Option<ArtworkId> {
        self.state.read().current
    }

    /// Last reported ratio for `id`
    pub fn ratio(&self, id: ArtworkId) -> Option<f32> {
        self.state.read().ratios.get(&id).copied()
    }

    pub fn add_subscriber(&self, subscriber: Arc<dyn CurrentItemSubscriber>) {
        self.subscribers.write().push(Arc::downgrade(&subscriber));
    }

    fn notify_subscribers(&self, id: ArtworkId) {
        let mut subscribers = self.subscribers.write();
        subscribers.retain(|weak| weak.strong_count() > 0);
        for weak in subscribers.iter() {
            if let Some(subscriber) = weak.upgrade() {
                subscriber.on_current_change(id);
            }
        }
    }
}

impl Default for ViewportTracker {
    fn default() -> Self {
        Self::new(DEFAULT_VISIBILITY_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_crossing_threshold_sets_current() {
        let tracker = ViewportTracker::default();
        assert_eq!(tracker.report(&[VisibilityReport::new(1, 0.3)]), None);
        assert_eq!(tracker.report(&[VisibilityReport::new(1, 0.6)]), Some(1));
        assert_eq!(tracker.current(), Some(1));
    }

    #[test]
    fn test_staying_above_threshold_is_not_a_crossing() {
        let tracker = ViewportTracker::default();
        tracker.report(&[VisibilityReport::new(1, 0.9)]);
        tracker.report(&[VisibilityReport::new(2, 0.7)]);
        assert_eq!(tracker.current(), Some(2));

        // 1 is still above the threshold, so it does not take over again
        assert_eq!(tracker.report(&[VisibilityReport::new(1, 0.95)]), None);
        assert_eq!(tracker.current(), Some(2));

        // dropping below and coming back does
        tracker.report(&[VisibilityReport::new(1, 0.1)]);
        assert_eq!(tracker.report(&[VisibilityReport::new(1, 0.8)]), Some(1));
    }

    #[test]
    fn test_topmost_wins_within_a_batch() {
        let tracker = ViewportTracker::default();
        tracker.set_order(&[10, 20, 30]);
        let current = tracker.report(&[
            VisibilityReport::new(30, 0.7),
            VisibilityReport::new(20, 0.9),
        ]);
        assert_eq!(current, Some(20));
    }

    #[test]
    fn test_unordered_items_fall_back_to_batch_order() {
        let tracker = ViewportTracker::default();
        let current = tracker.report(&[
            VisibilityReport::new(5, 0.7),
            VisibilityReport::new(4, 0.9),
        ]);
        assert_eq!(current, Some(5));
    }

    #[test]
    fn test_exact_threshold_counts_and_ratio_is_clamped() {
        let tracker = ViewportTracker::new(0.5);
        assert_eq!(tracker.report(&[VisibilityReport::new(3, 0.5)]), Some(3));
        tracker.report(&[VisibilityReport::new(4, 7.0)]);
        assert_eq!(tracker.ratio(4), Some(1.0));
        tracker.report(&[VisibilityReport::new(5, f32::NAN)]);
        assert_eq!(tracker.ratio(5), Some(0.0));
    }

    #[test]
    fn test_reset_forgets_everything() {
        let tracker = ViewportTracker::default();
        tracker.report(&[VisibilityReport::new(1, 0.8)]);
        tracker.reset();
        assert_eq!(tracker.current(), None);
        assert_eq!(tracker.ratio(1), None);
        assert_eq!(tracker.report(&[VisibilityReport::new(1, 0.8)]), Some(1));
    }

    #[derive(Default)]
    struct Follower {
        seen: Mutex<Vec<ArtworkId>>,
    }

    impl CurrentItemSubscriber for Follower {
        fn on_current_change(&self, artwork_id: ArtworkId) {
            self.seen.lock().push(artwork_id);
        }
    }

    #[test]
    fn test_subscribers_follow_changes_only() {
        let tracker = ViewportTracker::default();
        let follower = Arc::new(Follower::default());
        tracker.add_subscriber(follower.clone());

        tracker.report(&[VisibilityReport::new(1, 0.8)]);
        tracker.report(&[VisibilityReport::new(1, 0.2)]);
        tracker.report(&[VisibilityReport::new(1, 0.8)]);
        tracker.report(&[VisibilityReport::new(2, 0.8)]);

        assert_eq!(*follower.seen.lock(), vec![1, 2]);
    }
}
