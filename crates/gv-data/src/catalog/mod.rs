//! Validated, read-only catalog snapshot with lookups

use std::sync::Arc;

use ahash::{AHashMap, AHashSet};
use gv_core::{Artwork, ArtworkId, ExhibitionData, Section};
use tracing::{info, warn};
use uuid::Uuid;

use crate::query::{collate, year_token};
use crate::CatalogError;

/// Default number of related artworks shown next to a detail view
pub const RELATED_LIMIT: usize = 4;

/// An exhibition catalog after validation.
///
/// Cheap to clone; every clone shares the same snapshot and `snapshot_id`.
#[derive(Debug, Clone)]
pub struct Catalog {
    snapshot_id: Uuid,
    data: Arc<ExhibitionData>,
    artworks: Arc<[Artwork]>,
    by_id: Arc<AHashMap<ArtworkId, usize>>,
    sections_by_id: Arc<AHashMap<String, usize>>,
    slugs: Arc<ArtistSlugs>,
}

/// Unique page slug per artist name, both directions
#[derive(Debug, Default)]
struct ArtistSlugs {
    by_artist: AHashMap<String, String>,
    by_slug: AHashMap<String, String>,
}

impl ArtistSlugs {
    /// Names are taken in catalog order; a name whose slug is already taken
    /// gets the next free `-2`, `-3`, ... suffix.
    fn assign(artworks: &[Artwork]) -> Self {
        let mut slugs = Self::default();
        for artist in artworks.iter().map(|a| a.artist.as_str()) {
            if slugs.by_artist.contains_key(artist) {
                continue;
            }
            let base = match artist_slug(artist) {
                slug if slug.is_empty() => "artist".to_string(),
                slug => slug,
            };
            let mut slug = base.clone();
            let mut n = 2;
            while slugs.by_slug.contains_key(&slug) {
                slug = format!("{}-{}", base, n);
                n += 1;
            }
            if slug != base {
                warn!("Artist '{}' shares slug '{}', using '{}'", artist, base, slug);
            }
            slugs.by_slug.insert(slug.clone(), artist.to_string());
            slugs.by_artist.insert(artist.to_string(), slug);
        }
        slugs
    }
}

impl Catalog {
    /// Validate `data` and index it.
    ///
    /// Artwork ids must be positive and unique, section ids unique, and every
    /// section member must exist. When the document declares sections, each
    /// artwork's section key must name one of them.
    pub fn new(data: ExhibitionData) -> Result<Self, CatalogError> {
        let mut by_id = AHashMap::with_capacity(data.artworks.len());
        for (pos, artwork) in data.artworks.iter().enumerate() {
            if artwork.id == 0 {
                return Err(CatalogError::ZeroArtworkId);
            }
            if by_id.insert(artwork.id, pos).is_some() {
                return Err(CatalogError::DuplicateArtwork(artwork.id));
            }
        }

        let mut sections_by_id = AHashMap::with_capacity(data.sections.len());
        for (pos, section) in data.sections.iter().enumerate() {
            if sections_by_id.insert(section.id.clone(), pos).is_some() {
                return Err(CatalogError::DuplicateSection(section.id.clone()));
            }
            if let Some(missing) = section.artworks.iter().find(|id| !by_id.contains_key(*id)) {
                return Err(CatalogError::UnknownMember {
                    section: section.id.clone(),
                    artwork: *missing,
                });
            }
        }

        if !sections_by_id.is_empty() {
            if let Some(orphan) = data.artworks.iter().find(|a| !sections_by_id.contains_key(&a.section)) {
                return Err(CatalogError::UnknownSection {
                    artwork: orphan.id,
                    section: orphan.section.clone(),
                });
            }
        }

        if data.total_artworks != 0 && data.total_artworks != data.artworks.len() {
            warn!(
                "Catalog declares {} artworks but contains {}",
                data.total_artworks,
                data.artworks.len()
            );
        }

        let slugs = ArtistSlugs::assign(&data.artworks);
        let snapshot_id = Uuid::new_v4();
        info!(
            "Catalog '{}' loaded: {} artworks in {} sections (snapshot {})",
            data.title,
            data.artworks.len(),
            data.sections.len(),
            snapshot_id
        );

        Ok(Self {
            snapshot_id,
            artworks: data.artworks.clone().into(),
            data: Arc::new(data),
            by_id: Arc::new(by_id),
            sections_by_id: Arc::new(sections_by_id),
            slugs: Arc::new(slugs),
        })
    }

    /// Identity of this snapshot; a reloaded catalog gets a new one
    pub fn snapshot_id(&self) -> Uuid {
        self.snapshot_id
    }

    pub fn data(&self) -> &ExhibitionData {
        &self.data
    }

    pub fn title(&self) -> &str {
        &self.data.title
    }

    /// All artworks in catalog order
    pub fn artworks(&self) -> &[Artwork] {
        &self.artworks
    }

    /// Shared handle to the catalog-order sequence
    pub fn shared_artworks(&self) -> Arc<[Artwork]> {
        Arc::clone(&self.artworks)
    }

    pub fn sections(&self) -> &[Section] {
        &self.data.sections
    }

    pub fn len(&self) -> usize {
        self.artworks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artworks.is_empty()
    }

    pub fn artwork(&self, id: ArtworkId) -> Option<&Artwork> {
        self.by_id.get(&id).map(|&pos| &self.artworks[pos])
    }

    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections_by_id.get(id).map(|&pos| &self.data.sections[pos])
    }

    /// Members of a section in the section's declared order
    pub fn artworks_in_section(&self, section_id: &str) -> Vec<&Artwork> {
        self.section(section_id)
            .map(|section| section.artworks.iter().filter_map(|id| self.artwork(*id)).collect())
            .unwrap_or_default()
    }

    pub fn artworks_by_artist(&self, artist: &str) -> Vec<&Artwork> {
        self.artworks.iter().filter(|a| a.artist == artist).collect()
    }

    /// Distinct artist names, sorted
    pub fn artists(&self) -> Vec<&str> {
        distinct_sorted(self.artworks.iter().map(|a| a.artist.as_str()))
    }

    /// Distinct mediums, sorted
    pub fn mediums(&self) -> Vec<&str> {
        distinct_sorted(self.artworks.iter().map(|a| a.medium.as_str()))
    }

    /// Section keys used by artworks, in order of first appearance
    pub fn sections_in_use(&self) -> Vec<&str> {
        let mut seen = AHashSet::new();
        self.artworks
            .iter()
            .map(|a| a.section.as_str())
            .filter(|section| seen.insert(*section))
            .collect()
    }

    /// Earliest and latest parsed year, if any artwork has one
    pub fn year_range(&self) -> Option<(u16, u16)> {
        self.artworks
            .iter()
            .filter_map(|a| year_token(&a.year))
            .fold(None, |range, year| match range {
                None => Some((year, year)),
                Some((min, max)) => Some((min.min(year), max.max(year))),
            })
    }

    /// Following artwork in catalog order
    pub fn next(&self, id: ArtworkId) -> Option<&Artwork> {
        next_in(&self.artworks, id)
    }

    /// Preceding artwork in catalog order
    pub fn previous(&self, id: ArtworkId) -> Option<&Artwork> {
        previous_in(&self.artworks, id)
    }

    /// Artworks sharing a section or artist with `id`, catalog order
    pub fn related(&self, id: ArtworkId, limit: usize) -> Vec<&Artwork> {
        let Some(artwork) = self.artwork(id) else {
            return Vec::new();
        };
        self.artworks
            .iter()
            .filter(|other| other.id != id)
            .filter(|other| other.section == artwork.section || other.artist == artwork.artist)
            .take(limit)
            .collect()
    }

    /// Catalog artist whose page slug is `slug`
    pub fn artist_by_slug(&self, slug: &str) -> Option<&str> {
        self.slugs.by_slug.get(slug).map(String::as_str)
    }

    /// Page slug of a catalog artist, unique within this catalog
    pub fn slug_for(&self, artist: &str) -> Option<&str> {
        self.slugs.by_artist.get(artist).map(String::as_str)
    }
}

/// Neighbour after `id` in `sequence`; `None` at the end or when absent
pub fn next_in(sequence: &[Artwork], id: ArtworkId) -> Option<&Artwork> {
    let pos = sequence.iter().position(|a| a.id == id)?;
    sequence.get(pos + 1)
}

/// Neighbour before `id` in `sequence`; `None` at the start or when absent
pub fn previous_in(sequence: &[Artwork], id: ArtworkId) -> Option<&Artwork> {
    let pos = sequence.iter().position(|a| a.id == id)?;
    pos.checked_sub(1).and_then(|prev| sequence.get(prev))
}

/// URL-safe slug for an artist page.
///
/// Drops a parenthesised suffix such as a lifespan, lowercases, and joins the
/// remaining alphanumeric runs with single dashes.
pub fn artist_slug(name: &str) -> String {
    let name = match name.find('(') {
        Some(open) => &name[..open],
        None => name,
    };

    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

fn distinct_sorted<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = AHashSet::new();
    let mut distinct: Vec<&str> = values.filter(|v| !v.is_empty() && seen.insert(*v)).collect();
    distinct.sort_by(|a, b| collate(a, b));
    distinct
}
