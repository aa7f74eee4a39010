//! Incremental feed over a filtered/sorted artwork sequence
//!
//! The feed materialises a growing prefix ("window") of its input one page at
//! a time. Growth is driven by the rendering layer reporting that the sentinel
//! after the last rendered item became visible.

use serde::{Deserialize, Serialize};

mod engine;
mod subscriber;
mod window;

pub use engine::FeedController;
pub use subscriber::FeedSubscriber;
pub use window::FeedWindow;

/// Number of artworks appended per page
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Lifecycle of a feed window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FeedState {
    /// Ready to append the next page
    #[default]
    Idle,
    /// A page append is in progress
    Loading,
    /// The whole input sequence is materialised
    Exhausted,
}

/// Inputs of the feed state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedEvent {
    LoadStarted,
    PageLoaded { exhausted: bool },
    Reset,
}

impl FeedState {
    /// Total transition function. Events that make no sense in the current
    /// state leave it unchanged.
    pub fn on(self, event: FeedEvent) -> FeedState {
        match (self, event) {
            (_, FeedEvent::Reset) => FeedState::Idle,
            (FeedState::Idle, FeedEvent::LoadStarted) => FeedState::Loading,
            (FeedState::Loading, FeedEvent::PageLoaded { exhausted: true }) => FeedState::Exhausted,
            (FeedState::Loading, FeedEvent::PageLoaded { exhausted: false }) => FeedState::Idle,
            (state, _) => state,
        }
    }

    /// Whether a page append may start from this state
    pub fn accepts_load(self) -> bool {
        matches!(self, FeedState::Idle)
    }
}

/// Result of a `load_more` request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Request ignored because the feed was loading or exhausted
    Skipped(FeedState),
    /// A page was processed; `added` may be zero for the terminal empty page
    Appended { added: usize, exhausted: bool },
}

/// Result of a `jump_to` request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpOutcome {
    /// Target is in the window at `position`; `window_len` items are loaded
    Found { position: usize, window_len: usize },
    /// Target is not part of the input; the first page was loaded instead
    FellBack(LoadOutcome),
}

/// Read-only view of the feed passed to subscribers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedSnapshot {
    pub state: FeedState,
    /// Items currently in the window
    pub len: usize,
    /// Page cursor
    pub pages_loaded: usize,
    /// Length of the input sequence
    pub total: usize,
}

impl FeedSnapshot {
    pub fn has_more(&self) -> bool {
        self.state != FeedState::Exhausted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions_are_total() {
        let states = [FeedState::Idle, FeedState::Loading, FeedState::Exhausted];
        let events = [
            FeedEvent::LoadStarted,
            FeedEvent::PageLoaded { exhausted: true },
            FeedEvent::PageLoaded { exhausted: false },
            FeedEvent::Reset,
        ];
        for state in states {
            for event in events {
                let next = state.on(event);
                if event == FeedEvent::Reset {
                    assert_eq!(next, FeedState::Idle);
                }
            }
        }

        assert_eq!(FeedState::Idle.on(FeedEvent::LoadStarted), FeedState::Loading);
        assert_eq!(FeedState::Loading.on(FeedEvent::LoadStarted), FeedState::Loading);
        assert_eq!(FeedState::Exhausted.on(FeedEvent::LoadStarted), FeedState::Exhausted);
        assert_eq!(
            FeedState::Loading.on(FeedEvent::PageLoaded { exhausted: false }),
            FeedState::Idle
        );
        assert_eq!(
            FeedState::Idle.on(FeedEvent::PageLoaded { exhausted: true }),
            FeedState::Idle
        );
    }

    #[test]
    fn test_only_idle_accepts_load() {
        assert!(FeedState::Idle.accepts_load());
        assert!(!FeedState::Loading.accepts_load());
        assert!(!FeedState::Exhausted.accepts_load());
    }
}
