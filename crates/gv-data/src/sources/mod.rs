//! Catalog sources

pub mod embedded_source;
pub mod json_source;

pub use embedded_source::EmbeddedSource;
pub use json_source::JsonFileSource;

use gv_core::CatalogSource;
use tracing::info;

use crate::catalog::Catalog;

/// Load and validate a catalog from any source
pub async fn load_catalog(source: &dyn CatalogSource) -> anyhow::Result<Catalog> {
    info!("Loading catalog from {}", source.source_name());
    let data = source.load().await?;
    Ok(Catalog::new(data)?)
}
