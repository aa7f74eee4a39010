use gv_core::Artwork;
use tracing::debug;

use super::{active, year_token, FilterOptions};
use crate::config::SearchOptions;
use crate::index::SearchIndex;

/// Apply `filters` to `artworks`.
///
/// A non-blank search query first narrows the input to the search matches in
/// relevance order; the section, artist, medium and year-range predicates
/// then apply in that order. Without a prebuilt `index`, one is built over
/// `artworks` for this call.
pub fn filter_artworks(
    artworks: &[Artwork],
    filters: &FilterOptions,
    index: Option<&SearchIndex>,
) -> Vec<Artwork> {
    let query = active(&filters.search_query).filter(|q| !q.trim().is_empty());

    let candidates: Vec<&Artwork> = match query {
        Some(query) => match index {
            Some(index) => index.search_within(query, artworks),
            None => SearchIndex::build(artworks, SearchOptions::default()).search_within(query, artworks),
        },
        None => artworks.iter().collect(),
    };

    let section = active(&filters.section);
    let artist = active(&filters.artist);
    let medium = active(&filters.medium);

    let result: Vec<Artwork> = candidates
        .into_iter()
        .filter(|a| section.map_or(true, |s| a.section == s))
        .filter(|a| artist.map_or(true, |name| a.artist == name))
        .filter(|a| medium.map_or(true, |m| a.medium.contains(m)))
        .filter(|a| match filters.year_range {
            Some((min, max)) => year_token(&a.year).is_some_and(|year| (min..=max).contains(&year)),
            None => true,
        })
        .cloned()
        .collect();

    debug!("Filtered {} artworks down to {}", artworks.len(), result.len());
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use gv_core::ArtworkId;

    fn artwork(id: ArtworkId, artist: &str, medium: &str, year: &str, section: &str) -> Artwork {
        Artwork {
            id,
            title: format!("Work {}", id),
            artist: artist.to_string(),
            year: year.to_string(),
            medium: medium.to_string(),
            collection: String::new(),
            description: String::new(),
            image_url: format!("/images/{}.jpg", id),
            section: section.to_string(),
            url: None,
        }
    }

    fn sample() -> Vec<Artwork> {
        vec![
            artwork(1, "Claude Monet", "Oil on canvas", "1872", "light"),
            artwork(2, "Edgar Degas", "Pastel", "c. 1880", "figure"),
            artwork(3, "Claude Monet", "oil sketch", "1890-1891", "light"),
            artwork(4, "Paul Cézanne", "Oil on board", "circa unknown", "still-life"),
            artwork(5, "Edgar Degas", "Oil on canvas", "1875", "figure"),
        ]
    }

    fn ids(artworks: &[Artwork]) -> Vec<ArtworkId> {
        artworks.iter().map(|a| a.id).collect()
    }

    #[test]
    fn test_no_filters_keeps_catalog_order() {
        let artworks = sample();
        let result = filter_artworks(&artworks, &FilterOptions::default(), None);
        assert_eq!(ids(&result), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_medium_is_case_sensitive_substring() {
        let artworks = sample();
        let result = filter_artworks(&artworks, &FilterOptions::default().with_medium("Oil"), None);
        assert_eq!(ids(&result), vec![1, 4, 5]);
    }

    #[test]
    fn test_year_range_drops_unknown_years() {
        let artworks = sample();
        let filters = FilterOptions::default().with_year_range(1870, 1885);
        assert_eq!(ids(&filter_artworks(&artworks, &filters, None)), vec![1, 2, 5]);

        let filters = FilterOptions::default().with_year_range(1890, 1890);
        assert_eq!(ids(&filter_artworks(&artworks, &filters, None)), vec![3]);
    }

    #[test]
    fn test_predicates_combine() {
        let artworks = sample();
        let filters = FilterOptions::default()
            .with_section("figure")
            .with_artist("Edgar Degas")
            .with_medium("Oil");
        assert_eq!(ids(&filter_artworks(&artworks, &filters, None)), vec![5]);
    }

    #[test]
    fn test_empty_string_fields_are_ignored() {
        let artworks = sample();
        let filters = FilterOptions::default().with_section("").with_artist("").with_search("");
        assert_eq!(filter_artworks(&artworks, &filters, None).len(), artworks.len());
    }

    #[test]
    fn test_search_then_predicates() {
        let artworks = sample();
        let index = SearchIndex::build(&artworks, SearchOptions::default());
        let filters = FilterOptions::default().with_search("degas").with_year_range(1870, 1879);
        assert_eq!(ids(&filter_artworks(&artworks, &filters, Some(&index))), vec![5]);
    }

    #[test]
    fn test_search_without_prebuilt_index() {
        let artworks = sample();
        let filters = FilterOptions::default().with_search("monet");
        let result = filter_artworks(&artworks, &filters, None);
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|a| a.artist == "Claude Monet"));
    }
}
