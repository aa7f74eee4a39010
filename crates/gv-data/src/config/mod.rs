//! Viewer configuration

pub mod search_options;
pub mod viewer_config;

pub use search_options::*;
pub use viewer_config::*;
