//! Search tuning

use serde::{Deserialize, Serialize};

/// How free-text queries are matched against the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Allowed edit distance as a fraction of the query term length
    pub fuzzy: f32,

    /// Whether a query term also matches longer terms it starts
    pub prefix: bool,

    /// Relevance multiplier for title matches
    pub title_boost: f32,

    /// Relevance multiplier for artist matches
    pub artist_boost: f32,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            fuzzy: 0.2,
            prefix: true,
            title_boost: 2.0,
            artist_boost: 2.0,
        }
    }
}

impl SearchOptions {
    /// Largest edit distance accepted for a query term of `term_len` chars
    pub fn max_distance(&self, term_len: usize) -> usize {
        (self.fuzzy * term_len as f32).round() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_distance() {
        let options = SearchOptions::default();
        assert_eq!(options.max_distance(2), 0);
        assert_eq!(options.max_distance(3), 1);
        assert_eq!(options.max_distance(5), 1);
        assert_eq!(options.max_distance(8), 2);

        let exact = SearchOptions { fuzzy: 0.0, ..Default::default() };
        assert_eq!(exact.max_distance(12), 0);
    }
}
