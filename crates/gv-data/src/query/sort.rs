use std::cmp::Ordering;

use gv_core::Artwork;

use super::{year_token, SortOption};

/// Case-insensitive comparison with a byte-order tie-break, so distinct
/// strings never compare equal
pub fn collate(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| a.cmp(b))
}

/// Stable-sorted copy of `artworks`
pub fn sort_artworks(artworks: &[Artwork], sort_by: SortOption) -> Vec<Artwork> {
    let mut sorted = artworks.to_vec();
    match sort_by {
        SortOption::Chronological => {
            // Missing year sorts as 0, i.e. first
            sorted.sort_by_key(|a| year_token(&a.year).unwrap_or(0));
        }
        SortOption::Artist => sorted.sort_by(|a, b| collate(&a.artist, &b.artist)),
        SortOption::Title => sorted.sort_by(|a, b| collate(&a.title, &b.title)),
    }
    sorted
}
