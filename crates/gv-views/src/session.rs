//! Viewer session: catalog, query, feed and viewport wired together

use std::sync::Arc;

use gv_core::events::events::{CatalogLoaded, CurrentArtworkChanged, FeedPageLoaded, FeedReset, HotspotSelected};
use gv_core::{
    Artwork, AudioGuideState, ArtworkId, CoreError, EventBus, FeedController, FeedSnapshot, HotspotLayer, JumpOutcome, LoadOutcome,
    ViewportTracker, VisibilityReport,
};
use gv_data::catalog::{next_in, previous_in, RELATED_LIMIT};
use gv_data::{filter_artworks, sort_artworks, Catalog, FilterOptions, SearchIndexCache, SortOption, ViewerConfig};
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use crate::assets::AssetResolver;
use crate::deep_link::parse_artwork_param;

/// Unique identifier for a viewer session
pub type SessionId = Uuid;

#[derive(Debug, Clone, Default)]
struct QueryState {
    filters: FilterOptions,
    sort_by: SortOption,
}

/// One mounted feed over a catalog.
///
/// Changing filters, search or sort recomputes the visible sequence and
/// resets the feed; everything else only moves the feed and viewport forward.
pub struct ViewerSession {
    id: SessionId,
    catalog: Catalog,
    search_cache: SearchIndexCache,
    /// Held across every query change and feed transition so the query,
    /// the sequence and the feed window always describe the same results
    query: Mutex<QueryState>,
    sequence: RwLock<Arc<[Artwork]>>,
    feed: FeedController,
    viewport: ViewportTracker,
    hotspots: HotspotLayer,
    audio: AudioGuideState,
    events: Arc<EventBus>,
    assets: AssetResolver,
    /// Set once a deep link has positioned the feed
    deep_link_used: Mutex<bool>,
}

impl ViewerSession {
    /// Create a session with its own event bus
    pub fn new(catalog: Catalog, config: &ViewerConfig) -> Self {
        Self::with_events(catalog, config, Arc::new(EventBus::new()))
    }

    /// Create a session publishing to `events`
    pub fn with_events(catalog: Catalog, config: &ViewerConfig, events: Arc<EventBus>) -> Self {
        let session = Self {
            id: Uuid::new_v4(),
            search_cache: SearchIndexCache::new(config.search.clone()),
            query: Mutex::new(QueryState::default()),
            sequence: RwLock::new(Arc::from(Vec::new())),
            feed: FeedController::new(config.feed.page_size),
            viewport: ViewportTracker::new(config.viewport.threshold),
            hotspots: HotspotLayer::default(),
            audio: AudioGuideState::new(),
            assets: AssetResolver::new(config.avatars.clone()),
            deep_link_used: Mutex::new(false),
            events,
            catalog,
        };

        info!("Session {} opened on '{}'", session.id, session.catalog.title());
        session.events.publish(CatalogLoaded {
            title: session.catalog.title().to_string(),
            artwork_count: session.catalog.len(),
            section_count: session.catalog.sections().len(),
        });
        let reset = session.recompute(&session.query.lock());
        session.publish_reset(reset);
        session
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    pub fn feed(&self) -> &FeedController {
        &self.feed
    }

    pub fn viewport(&self) -> &ViewportTracker {
        &self.viewport
    }

    pub fn hotspots(&self) -> &HotspotLayer {
        &self.hotspots
    }

    pub fn audio(&self) -> &AudioGuideState {
        &self.audio
    }

    /// Start the audio guide for the current artwork, if there is one
    pub fn play_current_guide(&self) -> Option<ArtworkId> {
        let artwork = self.current_artwork()?;
        self.audio.play(&artwork);
        Some(artwork.id)
    }

    /// Search index built lazily on the first non-blank query
    pub fn search_cache(&self) -> &SearchIndexCache {
        &self.search_cache
    }

    pub fn assets(&self) -> &AssetResolver {
        &self.assets
    }

    pub fn filters(&self) -> FilterOptions {
        self.query.lock().filters.clone()
    }

    pub fn sort_by(&self) -> SortOption {
        self.query.lock().sort_by
    }

    /// Replace all filters. Returns false when nothing changed.
    pub fn set_filters(&self, filters: FilterOptions) -> bool {
        let mut query = self.query.lock();
        if query.filters == filters {
            return false;
        }
        query.filters = filters;
        let reset = self.recompute(&query);
        drop(query);
        self.publish_reset(reset);
        true
    }

    /// Change only the search box text
    pub fn set_search_query(&self, text: &str) -> bool {
        let search_query = if text.is_empty() { None } else { Some(text.to_string()) };
        let mut query = self.query.lock();
        if query.filters.search_query == search_query {
            return false;
        }
        query.filters.search_query = search_query;
        let reset = self.recompute(&query);
        drop(query);
        self.publish_reset(reset);
        true
    }

    pub fn set_sort(&self, sort_by: SortOption) -> bool {
        let mut query = self.query.lock();
        if query.sort_by == sort_by {
            return false;
        }
        query.sort_by = sort_by;
        let reset = self.recompute(&query);
        drop(query);
        self.publish_reset(reset);
        true
    }

    /// Drop every filter and the search query; the sort order stays
    pub fn clear_filters(&self) -> bool {
        self.set_filters(FilterOptions::default())
    }

    /// The filtered, sorted sequence the feed pages through
    pub fn visible_sequence(&self) -> Arc<[Artwork]> {
        self.sequence.read().clone()
    }

    pub fn result_count(&self) -> usize {
        self.sequence.read().len()
    }

    /// Artworks currently materialised in the feed
    pub fn feed_items(&self) -> Vec<Artwork> {
        self.feed.items()
    }

    pub fn feed_snapshot(&self) -> FeedSnapshot {
        self.feed.snapshot()
    }

    pub fn load_more(&self) -> LoadOutcome {
        let (outcome, loaded) = {
            let _query = self.query.lock();
            let outcome = self.feed.load_more();
            let loaded = match outcome {
                LoadOutcome::Appended { added, exhausted } => Some(self.after_feed_growth(added, exhausted)),
                LoadOutcome::Skipped(_) => None,
            };
            (outcome, loaded)
        };
        if let Some(event) = loaded {
            self.events.publish(event);
        }
        outcome
    }

    /// Rendering layer callback for the sentinel below the last item
    pub fn sentinel_visible(&self) -> LoadOutcome {
        self.load_more()
    }

    /// Materialise the feed far enough to show `target`
    pub fn jump_to(&self, target: ArtworkId) -> JumpOutcome {
        let (outcome, loaded) = {
            let _query = self.query.lock();
            let before = self.feed.snapshot().len;
            let outcome = self.feed.jump_to(target);
            let loaded = match outcome {
                JumpOutcome::Found { .. } => {
                    let snapshot = self.feed.snapshot();
                    Some(self.after_feed_growth(snapshot.len.saturating_sub(before), !snapshot.has_more()))
                }
                JumpOutcome::FellBack(LoadOutcome::Appended { added, exhausted }) => {
                    Some(self.after_feed_growth(added, exhausted))
                }
                JumpOutcome::FellBack(LoadOutcome::Skipped(_)) => None,
            };
            (outcome, loaded)
        };
        if let Some(event) = loaded {
            self.events.publish(event);
        }
        outcome
    }

    /// Position the feed at the artwork named by a `?artwork=<id>` link.
    ///
    /// Honoured once per session: later links, and links without a valid
    /// artwork id, return `None` and leave the feed alone.
    pub fn open_deep_link(&self, link: &str) -> Option<JumpOutcome> {
        let target = parse_artwork_param(link)?;
        {
            let mut used = self.deep_link_used.lock();
            if *used {
                debug!("Ignoring deep link to artwork {}, session already positioned", target);
                return None;
            }
            *used = true;
        }
        Some(self.jump_to(target))
    }

    /// Feed visibility observations from the renderer. Returns the new
    /// current artwork when it changed.
    pub fn report_visibility(&self, batch: &[VisibilityReport]) -> Option<ArtworkId> {
        let current = self.viewport.report(batch)?;
        self.events.publish(CurrentArtworkChanged { artwork_id: current });
        Some(current)
    }

    /// Scene click on a hotspot. Returns the artwork it points at, if any.
    pub fn click_hotspot(&self, hotspot_id: &str) -> Result<Option<ArtworkId>, CoreError> {
        let target = self.hotspots.click(hotspot_id)?;
        self.events.publish(HotspotSelected {
            hotspot_id: hotspot_id.to_string(),
            artwork_id: target,
        });
        Ok(target)
    }

    pub fn current_artwork(&self) -> Option<Artwork> {
        let id = self.viewport.current()?;
        self.catalog.artwork(id).cloned()
    }

    /// Following artwork in the visible sequence
    pub fn next(&self, id: ArtworkId) -> Option<Artwork> {
        next_in(&self.sequence.read(), id).cloned()
    }

    /// Preceding artwork in the visible sequence
    pub fn previous(&self, id: ArtworkId) -> Option<Artwork> {
        previous_in(&self.sequence.read(), id).cloned()
    }

    pub fn related(&self, id: ArtworkId) -> Vec<Artwork> {
        self.catalog.related(id, RELATED_LIMIT).into_iter().cloned().collect()
    }

    fn after_feed_growth(&self, added: usize, exhausted: bool) -> FeedPageLoaded {
        let ids = self.feed.item_ids();
        self.viewport.set_order(&ids);
        FeedPageLoaded {
            added,
            window_len: ids.len(),
            exhausted,
        }
    }

    fn publish_reset(&self, reset: Option<FeedReset>) {
        if let Some(event) = reset {
            self.events.publish(event);
        }
    }

    /// Rebuild the sequence for `query` and hand it to the feed. Called with
    /// the query lock held; events go out after the caller releases it.
    fn recompute(&self, query: &QueryState) -> Option<FeedReset> {
        let QueryState { filters, sort_by } = query;

        let searching = filters.search_query.as_deref().is_some_and(|q| !q.trim().is_empty());
        let index = searching.then(|| self.search_cache.get_or_build(&self.catalog));

        let filtered = filter_artworks(self.catalog.artworks(), filters, index.as_deref());
        let sequence: Arc<[Artwork]> = sort_artworks(&filtered, *sort_by).into();
        let result_count = sequence.len();

        *self.sequence.write() = Arc::clone(&sequence);
        debug!("Session {}: {} results sorted by {}", self.id, result_count, sort_by);
        if self.feed.set_source(sequence) {
            self.viewport.reset();
            Some(FeedReset { result_count })
        } else {
            None
        }
    }
}
