//! Filter and sort criteria applied to the catalog before paging

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

mod filter;
mod sort;
mod year;

pub use filter::filter_artworks;
pub use sort::{collate, sort_artworks};
pub use year::year_token;

/// User-selected constraints. An unset (or empty) field imposes nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    /// Substring of the medium, case-sensitive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
    /// Inclusive `[min, max]` over the parsed year
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_range: Option<(u16, u16)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,
}

impl FilterOptions {
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    pub fn with_medium(mut self, medium: impl Into<String>) -> Self {
        self.medium = Some(medium.into());
        self
    }

    pub fn with_year_range(mut self, min: u16, max: u16) -> Self {
        self.year_range = Some((min, max));
        self
    }

    pub fn with_search(mut self, query: impl Into<String>) -> Self {
        self.search_query = Some(query.into());
        self
    }

    /// Whether any of the dropdown filters (not the search box) is active
    pub fn has_field_filters(&self) -> bool {
        active(&self.section).is_some()
            || active(&self.artist).is_some()
            || active(&self.medium).is_some()
            || self.year_range.is_some()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_field_filters() && active(&self.search_query).map_or(true, |q| q.trim().is_empty())
    }
}

/// Treat `Some("")` the same as `None`
pub(crate) fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Catalog ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOption {
    #[default]
    Chronological,
    Artist,
    Title,
}

impl SortOption {
    pub const ALL: [SortOption; 3] = [SortOption::Chronological, SortOption::Artist, SortOption::Title];

    pub fn as_str(self) -> &'static str {
        match self {
            SortOption::Chronological => "chronological",
            SortOption::Artist => "artist",
            SortOption::Title => "title",
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortOption::ALL
            .into_iter()
            .find(|option| option.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown sort option '{}' (expected chronological, artist or title)", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_option_parse() {
        assert_eq!("title".parse::<SortOption>().unwrap(), SortOption::Title);
        assert_eq!(" Artist ".parse::<SortOption>().unwrap(), SortOption::Artist);
        assert!("random".parse::<SortOption>().is_err());
        assert_eq!(SortOption::default().to_string(), "chronological");
    }

    #[test]
    fn test_empty_strings_count_as_unset() {
        let filters = FilterOptions {
            section: Some(String::new()),
            search_query: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(!filters.has_field_filters());
        assert!(filters.is_empty());
        assert!(!FilterOptions::default().with_year_range(1870, 1880).is_empty());
    }

    #[test]
    fn test_filter_options_json_shape() {
        let filters: FilterOptions =
            serde_json::from_str(r#"{"medium":"Oil","yearRange":[1870,1880]}"#).unwrap();
        assert_eq!(filters.medium.as_deref(), Some("Oil"));
        assert_eq!(filters.year_range, Some((1870, 1880)));
        assert_eq!(filters.section, None);
    }
}
