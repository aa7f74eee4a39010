//! Exhibition catalog data model
//!
//! The shapes mirror the static exhibition document: one root object with
//! exhibition metadata, the ordered artwork list and the section list.

use serde::{Deserialize, Serialize};

/// Unique identifier of an artwork within a catalog
pub type ArtworkId = u32;

/// A single catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artwork {
    pub id: ArtworkId,
    pub title: String,
    pub artist: String,
    /// Free text, may contain a 4-digit year ("c. 1874", "1890-1892")
    pub year: String,
    pub medium: String,
    #[serde(default)]
    pub collection: String,
    #[serde(default)]
    pub description: String,
    pub image_url: String,
    /// Key of the section this artwork belongs to
    pub section: String,
    /// External reference page, when the collection publishes one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A thematic grouping of artworks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Member artwork ids in display order
    #[serde(default)]
    pub artworks: Vec<ArtworkId>,
}

/// Root aggregate of the static exhibition document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExhibitionData {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub english_title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub dates: String,
    #[serde(default)]
    pub venue: String,
    #[serde(default)]
    pub total_artworks: usize,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub artworks: Vec<Artwork>,
}
