use std::borrow::Cow;

use async_trait::async_trait;
use gv_core::ExhibitionData;

use crate::CatalogError;

/// Exhibition document held in memory, e.g. compiled in with `include_str!`
pub struct EmbeddedSource {
    name: String,
    json: Cow<'static, str>,
}

impl EmbeddedSource {
    pub fn new(name: impl Into<String>, json: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            json: json.into(),
        }
    }

    pub fn parse(&self) -> Result<ExhibitionData, CatalogError> {
        Ok(serde_json::from_str(&self.json)?)
    }
}

#[async_trait]
impl gv_core::data::CatalogSource for EmbeddedSource {
    async fn load(&self) -> anyhow::Result<ExhibitionData> {
        Ok(self.parse()?)
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::load_catalog;

    #[tokio::test]
    async fn test_load_embedded_catalog() {
        let source = EmbeddedSource::new(
            "inline",
            r#"{"title": "Inline", "artworks": [{"id": 7, "title": "Nocturne", "artist": "James McNeill Whistler",
                "year": "1875", "medium": "Oil on panel", "imageUrl": "/n.jpg", "section": "night"}]}"#,
        );
        let catalog = load_catalog(&source).await.unwrap();
        assert_eq!(catalog.title(), "Inline");
        assert_eq!(catalog.artwork(7).unwrap().artist, "James McNeill Whistler");
    }

    #[tokio::test]
    async fn test_invalid_catalog_rejected() {
        let source = EmbeddedSource::new(
            "dupes",
            r#"{"artworks": [
                {"id": 1, "title": "A", "artist": "X", "year": "", "medium": "", "imageUrl": "", "section": "s"},
                {"id": 1, "title": "B", "artist": "Y", "year": "", "medium": "", "imageUrl": "", "section": "s"}]}"#
                .to_string(),
        );
        let err = load_catalog(&source).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<CatalogError>(), Some(CatalogError::DuplicateArtwork(1))));
    }
}
