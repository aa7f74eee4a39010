//! Type-keyed event bus shared by the session and its observers

use std::any::{Any, TypeId};
use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::RwLock;

type HandlerList = Vec<Arc<dyn EventHandler>>;

/// Viewer-wide event bus.
///
/// Handlers run outside the bus lock, so a handler may publish further
/// events or subscribe new handlers. A handler subscribed while an event is
/// being delivered first sees the next event of that type.
pub struct EventBus {
    handlers: RwLock<AHashMap<TypeId, HandlerList>>,
}

/// Implemented by every event type
pub trait Event: Send + Sync + 'static {
    fn as_any(&self) -> &dyn Any;
}

/// Receives published events
pub trait EventHandler: Send + Sync {
    fn handle(&self, event: &dyn Event);
}

/// Common viewer events
pub mod events {
    use super::Event;
    use crate::catalog::ArtworkId;

    /// Catalog finished loading
    #[derive(Debug, Clone)]
    pub struct CatalogLoaded {
        pub title: String,
        pub artwork_count: usize,
        pub section_count: usize,
    }

    /// A page was appended to the feed window
    #[derive(Debug, Clone)]
    pub struct FeedPageLoaded {
        pub added: usize,
        pub window_len: usize,
        pub exhausted: bool,
    }

    /// Filters, search or sort changed and the feed started over
    #[derive(Debug, Clone)]
    pub struct FeedReset {
        pub result_count: usize,
    }

    /// The most visible artwork changed
    #[derive(Debug, Clone)]
    pub struct CurrentArtworkChanged {
        pub artwork_id: ArtworkId,
    }

    /// A hotspot was clicked in the scene
    #[derive(Debug, Clone)]
    pub struct HotspotSelected {
        pub hotspot_id: String,
        pub artwork_id: Option<ArtworkId>,
    }

    macro_rules! impl_event {
        ($($t:ty),*) => {
            $(
                impl Event for $t {
                    fn as_any(&self) -> &dyn std::any::Any {
                        self
                    }
                }
            )*
        }
    }

    impl_event!(
        CatalogLoaded,
        FeedPageLoaded,
        FeedReset,
        CurrentArtworkChanged,
        HotspotSelected
    );
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(AHashMap::new()),
        }
    }

    /// Subscribe to events of type `E`
    pub fn subscribe<E: Event>(&self, handler: Box<dyn EventHandler>) {
        self.handlers
            .write()
            .entry(TypeId::of::<E>())
            .or_default()
            .push(Arc::from(handler));
    }

    /// Number of handlers registered for `E`
    pub fn handler_count<E: Event>(&self) -> usize {
        self.handlers.read().get(&TypeId::of::<E>()).map_or(0, Vec::len)
    }

    /// Deliver `event` to every handler subscribed to `E`
    pub fn publish<E: Event>(&self, event: E) {
        let snapshot: HandlerList = match self.handlers.read().get(&TypeId::of::<E>()) {
            Some(handlers) => handlers.clone(),
            None => return,
        };
        for handler in &snapshot {
            handler.handle(&event);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

struct ClosureEventHandler<F> {
    handler: F,
}

impl<F> EventHandler for ClosureEventHandler<F>
where
    F: Fn(&dyn Event) + Send + Sync,
{
    fn handle(&self, event: &dyn Event) {
        (self.handler)(event);
    }
}

/// Handler from a closure that sees every event it is subscribed to
pub fn handler_from_fn<F>(f: F) -> Box<dyn EventHandler>
where
    F: Fn(&dyn Event) + Send + Sync + 'static,
{
    Box::new(ClosureEventHandler { handler: f })
}

/// Handler that only sees events of type `E`
pub fn typed_handler<E, F>(f: F) -> Box<dyn EventHandler>
where
    E: Event,
    F: Fn(&E) + Send + Sync + 'static,
{
    handler_from_fn(move |event| {
        if let Some(event) = event.as_any().downcast_ref::<E>() {
            f(event);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::events::{CurrentArtworkChanged, FeedPageLoaded, FeedReset};
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_publish_reaches_typed_subscribers_only() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        bus.subscribe::<CurrentArtworkChanged>(typed_handler(move |e: &CurrentArtworkChanged| {
            sink.lock().push(e.artwork_id);
        }));

        bus.publish(CurrentArtworkChanged { artwork_id: 4 });
        bus.publish(FeedReset { result_count: 10 });
        bus.publish(CurrentArtworkChanged { artwork_id: 9 });

        assert_eq!(*seen.lock(), vec![4, 9]);
    }

    #[test]
    fn test_handler_can_publish_and_subscribe() {
        let bus = Arc::new(EventBus::new());
        let pages = Arc::new(Mutex::new(Vec::new()));

        let sink = pages.clone();
        bus.subscribe::<FeedPageLoaded>(typed_handler(move |e: &FeedPageLoaded| {
            sink.lock().push(e.window_len);
        }));

        // A reset immediately announces an empty window and registers a
        // second reset listener
        let inner = Arc::downgrade(&bus);
        bus.subscribe::<FeedReset>(typed_handler(move |_: &FeedReset| {
            if let Some(bus) = inner.upgrade() {
                bus.publish(FeedPageLoaded {
                    added: 0,
                    window_len: 0,
                    exhausted: false,
                });
                bus.subscribe::<FeedReset>(handler_from_fn(|_| {}));
            }
        }));

        bus.publish(FeedReset { result_count: 3 });
        assert_eq!(*pages.lock(), vec![0]);
        assert_eq!(bus.handler_count::<FeedReset>(), 2);
    }
}
