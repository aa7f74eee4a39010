//! Session layer for the exhibition viewer
//!
//! Composes the catalog, query engine, feed and viewport tracker into one
//! [`ViewerSession`] per mounted feed, plus deep-link and asset helpers the
//! rendering layer needs.

pub mod assets;
pub mod deep_link;
mod session;

pub use assets::{artist_color, AssetResolver, AvatarSource, IMAGE_PLACEHOLDER};
pub use deep_link::{artwork_link, parse_artwork_param};
pub use session::{SessionId, ViewerSession};
