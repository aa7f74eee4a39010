//! Feed subscriber trait

use super::FeedSnapshot;

/// Trait for components that need to respond to feed window changes
pub trait FeedSubscriber: Send + Sync {
    /// Called after a page append, a jump or a reset
    fn on_feed_change(&self, snapshot: &FeedSnapshot);
}
