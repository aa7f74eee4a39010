//! Feed controller implementation

use super::{FeedSnapshot, FeedSubscriber, FeedWindow, JumpOutcome, LoadOutcome};
use crate::catalog::{Artwork, ArtworkId};
use parking_lot::RwLock;
use std::sync::{Arc, Weak};
use tracing::{debug, info};

/// Shared feed controller
///
/// Every operation runs under the window's write lock, so two page appends
/// never interleave even when the sentinel fires from several callers.
pub struct FeedController {
    window: Arc<RwLock<FeedWindow>>,
    subscribers: Arc<RwLock<Vec<Weak<dyn FeedSubscriber>>>>,
}

impl FeedController {
    /// Create a controller with an empty input
    pub fn new(page_size: usize) -> Self {
        Self {
            window: Arc::new(RwLock::new(FeedWindow::new(page_size))),
            subscribers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Feed a new filtered/sorted sequence. The window resets when the
    /// sequence is not the one already installed.
    pub fn set_source(&self, source: Arc<[Artwork]>) -> bool {
        let total = source.len();
        let reset = self.window.write().replace_source(source);
        if reset {
            info!("Feed input changed ({} artworks), window reset", total);
            self.notify_subscribers();
        }
        reset
    }

    /// Append the next page
    pub fn load_more(&self) -> LoadOutcome {
        let outcome = self.window.write().load_more();
        match outcome {
            LoadOutcome::Appended { added, exhausted } => {
                debug!("Appended {} artworks to feed (exhausted: {})", added, exhausted);
                self.notify_subscribers();
            }
            LoadOutcome::Skipped(state) => {
                debug!("load_more skipped in state {:?}", state);
            }
        }
        outcome
    }

    /// Called by the rendering layer when the sentinel after the last
    /// rendered item enters the viewport
    pub fn sentinel_visible(&self) -> LoadOutcome {
        self.load_more()
    }

    /// Materialise the window up to `target` (deep-link entry point)
    pub fn jump_to(&self, target: ArtworkId) -> JumpOutcome {
        let outcome = self.window.write().jump_to(target);
        match outcome {
            JumpOutcome::Found { position, window_len } => {
                info!("Jumped to artwork {} at position {} ({} loaded)", target, position, window_len);
            }
            JumpOutcome::FellBack(_) => {
                info!("Artwork {} not in feed, loading first page", target);
            }
        }
        self.notify_subscribers();
        outcome
    }

    /// Reset the window without changing the input
    pub fn reset(&self) {
        self.window.write().reset();
        self.notify_subscribers();
    }

    /// Get current feed state
    pub fn snapshot(&self) -> FeedSnapshot {
        self.window.read().snapshot()
    }

    /// Copy of the materialised window
    pub fn items(&self) -> Vec<Artwork> {
        self.window.read().items().to_vec()
    }

    /// Ids in the window, in display order
    pub fn item_ids(&self) -> Vec<ArtworkId> {
        self.window.read().items().iter().map(|a| a.id).collect()
    }

    /// Run `f` against the window without copying it
    pub fn with_items<R>(&self, f: impl FnOnce(&[Artwork]) -> R) -> R {
        f(self.window.read().items())
    }

    pub fn contains(&self, id: ArtworkId) -> bool {
        self.window.read().contains(id)
    }

    pub fn page_size(&self) -> usize {
        self.window.read().page_size()
    }

    /// Add a subscriber
    pub fn add_subscriber(&self, subscriber: Arc<dyn FeedSubscriber>) {
        let mut subscribers = self.subscribers.write();
        subscribers.push(Arc::downgrade(&subscriber));
    }

    /// Notify all subscribers of a window change
    fn notify_subscribers(&self) {
        let snapshot = self.snapshot();
        let mut subscribers = self.subscribers.write();

        // Remove any dead weak references
        subscribers.retain(|weak| weak.strong_count() > 0);

        for weak in subscribers.iter() {
            if let Some(subscriber) = weak.upgrade() {
                subscriber.on_feed_change(&snapshot);
            }
        }
    }
}

impl Default for FeedController {
    fn default() -> Self {
        Self::new(super::DEFAULT_PAGE_SIZE)
    }
}
