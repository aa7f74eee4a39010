//! Feed window state machine

use std::ops::Range;
use std::sync::Arc;

use ahash::AHashSet;

use super::{FeedEvent, FeedSnapshot, FeedState, JumpOutcome, LoadOutcome, DEFAULT_PAGE_SIZE};
use crate::catalog::{Artwork, ArtworkId};

/// Materialised prefix of an input sequence plus its page cursor
#[derive(Debug, Clone)]
pub struct FeedWindow {
    source: Arc<[Artwork]>,
    items: Vec<Artwork>,
    /// Ids already in `items`; a window never holds the same id twice
    seen: AHashSet<ArtworkId>,
    cursor: usize,
    state: FeedState,
    page_size: usize,
}

impl FeedWindow {
    /// Create an empty window over an empty input
    pub fn new(page_size: usize) -> Self {
        Self::with_source(Arc::from(Vec::new()), page_size)
    }

    /// Create an idle, empty window over `source`
    pub fn with_source(source: Arc<[Artwork]>, page_size: usize) -> Self {
        Self {
            source,
            items: Vec::new(),
            seen: AHashSet::new(),
            cursor: 0,
            state: FeedState::Idle,
            page_size: page_size.max(1),
        }
    }

    /// Swap the input sequence. Resets the window when the new input is a
    /// different sequence; returns whether a reset happened.
    pub fn replace_source(&mut self, source: Arc<[Artwork]>) -> bool {
        if Arc::ptr_eq(&self.source, &source) {
            return false;
        }
        self.source = source;
        self.reset();
        true
    }

    /// Drop everything materialised so far and start over from page zero
    pub fn reset(&mut self) {
        self.items.clear();
        self.seen.clear();
        self.cursor = 0;
        self.state = self.state.on(FeedEvent::Reset);
    }

    /// Append the next page of the input
    pub fn load_more(&mut self) -> LoadOutcome {
        if !self.state.accepts_load() {
            return LoadOutcome::Skipped(self.state);
        }
        self.state = self.state.on(FeedEvent::LoadStarted);

        let total = self.source.len();
        let start = self.cursor * self.page_size;
        if start >= total {
            self.state = self.state.on(FeedEvent::PageLoaded { exhausted: true });
            return LoadOutcome::Appended { added: 0, exhausted: true };
        }

        let end = (start + self.page_size).min(total);
        let added = self.append(start..end);
        self.cursor += 1;

        let exhausted = end >= total;
        self.state = self.state.on(FeedEvent::PageLoaded { exhausted });
        LoadOutcome::Appended { added, exhausted }
    }

    /// Materialise every page up to and including the one holding `target`.
    /// Falls back to an ordinary `load_more` when `target` is not in the input.
    pub fn jump_to(&mut self, target: ArtworkId) -> JumpOutcome {
        let Some(position) = self.source.iter().position(|a| a.id == target) else {
            return JumpOutcome::FellBack(self.load_more());
        };

        if self.state.accepts_load() {
            self.state = self.state.on(FeedEvent::LoadStarted);

            let total = self.source.len();
            let pages = (position + 1).div_ceil(self.page_size);
            let end = (pages * self.page_size).min(total);
            let start = (self.cursor * self.page_size).min(end);
            self.append(start..end);
            self.cursor = self.cursor.max(pages);

            self.state = self.state.on(FeedEvent::PageLoaded { exhausted: end >= total });
        }

        JumpOutcome::Found {
            position,
            window_len: self.items.len(),
        }
    }

    fn append(&mut self, range: Range<usize>) -> usize {
        let before = self.items.len();
        for artwork in &self.source[range] {
            if self.seen.insert(artwork.id) {
                self.items.push(artwork.clone());
            }
        }
        self.items.len() - before
    }

    pub fn items(&self) -> &[Artwork] {
        &self.items
    }

    pub fn source(&self) -> &Arc<[Artwork]> {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: ArtworkId) -> bool {
        self.seen.contains(&id)
    }

    /// Index of `id` within the window
    pub fn position(&self, id: ArtworkId) -> Option<usize> {
        self.items.iter().position(|a| a.id == id)
    }

    pub fn state(&self) -> FeedState {
        self.state
    }

    pub fn has_more(&self) -> bool {
        self.state != FeedState::Exhausted
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn snapshot(&self) -> FeedSnapshot {
        FeedSnapshot {
            state: self.state,
            len: self.items.len(),
            pages_loaded: self.cursor,
            total: self.source.len(),
        }
    }
}

impl Default for FeedWindow {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}
