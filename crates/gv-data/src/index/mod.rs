//! Full-text search over the catalog
//!
//! An inverted index over title, artist, year, medium, section and
//! description. Query terms match indexed terms exactly, by prefix, or within
//! a bounded edit distance; matches are scored BM25-style with title and
//! artist boosted.

mod distance;

use std::collections::BTreeMap;
use std::ops::Bound;

use ahash::{AHashMap, AHashSet};
use gv_core::{Artwork, ArtworkId};
use tracing::debug;

use crate::config::SearchOptions;
pub use distance::bounded_levenshtein;

const PREFIX_WEIGHT: f32 = 0.375;
const FUZZY_WEIGHT: f32 = 0.45;
const BM25_K1: f32 = 1.2;
const BM25_B: f32 = 0.7;

/// Indexed artwork fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchField {
    Title,
    Artist,
    Year,
    Medium,
    Section,
    Description,
}

impl SearchField {
    pub const ALL: [SearchField; 6] = [
        SearchField::Title,
        SearchField::Artist,
        SearchField::Year,
        SearchField::Medium,
        SearchField::Section,
        SearchField::Description,
    ];

    fn slot(self) -> usize {
        self as usize
    }

    fn text(self, artwork: &Artwork) -> &str {
        match self {
            SearchField::Title => &artwork.title,
            SearchField::Artist => &artwork.artist,
            SearchField::Year => &artwork.year,
            SearchField::Medium => &artwork.medium,
            SearchField::Section => &artwork.section,
            SearchField::Description => &artwork.description,
        }
    }
}

/// A ranked search result
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit {
    pub id: ArtworkId,
    pub score: f32,
}

#[derive(Debug, Clone)]
struct Posting {
    doc: usize,
    field: SearchField,
    tf: u32,
}

/// Inverted index over one catalog snapshot
#[derive(Debug)]
pub struct SearchIndex {
    ids: Vec<ArtworkId>,
    terms: BTreeMap<String, Vec<Posting>>,
    field_lengths: Vec<[u32; 6]>,
    avg_field_lengths: [f32; 6],
    options: SearchOptions,
}

/// Lowercased alphanumeric runs
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
}

impl SearchIndex {
    /// Index every artwork in `artworks`
    pub fn build(artworks: &[Artwork], options: SearchOptions) -> Self {
        let mut terms: BTreeMap<String, Vec<Posting>> = BTreeMap::new();
        let mut field_lengths = Vec::with_capacity(artworks.len());
        let mut totals = [0u64; 6];

        for (doc, artwork) in artworks.iter().enumerate() {
            let mut lengths = [0u32; 6];
            for field in SearchField::ALL {
                let mut counts: AHashMap<String, u32> = AHashMap::new();
                for token in tokenize(field.text(artwork)) {
                    *counts.entry(token).or_default() += 1;
                    lengths[field.slot()] += 1;
                }
                for (term, tf) in counts {
                    terms.entry(term).or_default().push(Posting { doc, field, tf });
                }
            }
            for (total, len) in totals.iter_mut().zip(lengths) {
                *total += u64::from(len);
            }
            field_lengths.push(lengths);
        }

        let docs = artworks.len().max(1) as f32;
        let avg_field_lengths = totals.map(|total| (total as f32 / docs).max(1.0));

        debug!("Indexed {} artworks, {} distinct terms", artworks.len(), terms.len());

        Self {
            ids: artworks.iter().map(|a| a.id).collect(),
            terms,
            field_lengths,
            avg_field_lengths,
            options,
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Artworks matching `query`, best first. Ties keep catalog order.
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        let mut query_terms: Vec<String> = Vec::new();
        for term in tokenize(query) {
            if !query_terms.contains(&term) {
                query_terms.push(term);
            }
        }

        let mut scores: AHashMap<usize, f32> = AHashMap::new();
        let doc_count = self.ids.len() as f32;

        for query_term in &query_terms {
            for (term, weight) in self.matching_terms(query_term) {
                let postings = &self.terms[term];
                let df = postings.iter().map(|p| p.doc).collect::<AHashSet<_>>().len() as f32;
                let idf = (1.0 + (doc_count - df + 0.5) / (df + 0.5)).ln();

                for posting in postings {
                    let field_len = self.field_lengths[posting.doc][posting.field.slot()] as f32;
                    let avg_len = self.avg_field_lengths[posting.field.slot()];
                    let tf = posting.tf as f32;
                    let tf_norm = tf * (BM25_K1 + 1.0)
                        / (tf + BM25_K1 * (1.0 - BM25_B + BM25_B * field_len / avg_len));

                    *scores.entry(posting.doc).or_default() +=
                        weight * self.boost(posting.field) * idf * tf_norm;
                }
            }
        }

        let mut hits: Vec<(usize, f32)> = scores.into_iter().filter(|(_, s)| *s > 0.0).collect();
        hits.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

        hits.into_iter()
            .map(|(doc, score)| SearchHit { id: self.ids[doc], score })
            .collect()
    }

    /// Restrict `artworks` to those matching `query`, in relevance order.
    /// A blank query keeps every artwork in its given order.
    pub fn search_within<'a>(&self, query: &str, artworks: &'a [Artwork]) -> Vec<&'a Artwork> {
        if query.trim().is_empty() {
            return artworks.iter().collect();
        }

        let by_id: AHashMap<ArtworkId, &Artwork> = artworks.iter().map(|a| (a.id, a)).collect();
        self.search(query)
            .into_iter()
            .filter_map(|hit| by_id.get(&hit.id).copied())
            .collect()
    }

    fn boost(&self, field: SearchField) -> f32 {
        match field {
            SearchField::Title => self.options.title_boost,
            SearchField::Artist => self.options.artist_boost,
            _ => 1.0,
        }
    }

    /// Indexed terms matched by `query_term` with their match weight; when a
    /// term matches several ways the best weight is kept
    fn matching_terms(&self, query_term: &str) -> Vec<(&str, f32)> {
        let mut matches: AHashMap<&str, f32> = AHashMap::new();
        let query_chars: Vec<char> = query_term.chars().collect();
        let query_len = query_chars.len() as f32;

        if let Some((term, _)) = self.terms.get_key_value(query_term) {
            matches.insert(term.as_str(), 1.0);
        }

        if self.options.prefix {
            for (term, _) in self
                .terms
                .range::<str, _>((Bound::Included(query_term), Bound::Unbounded))
                .take_while(|(term, _)| term.starts_with(query_term))
            {
                if term == query_term {
                    continue;
                }
                let extra = (term.chars().count() as f32) - query_len;
                let weight = PREFIX_WEIGHT * query_len / (query_len + 0.3 * extra);
                keep_best(&mut matches, term, weight);
            }
        }

        let max_distance = self.options.max_distance(query_chars.len());
        if max_distance > 0 {
            for term in self.terms.keys() {
                let term_chars: Vec<char> = term.chars().collect();
                if let Some(d) = bounded_levenshtein(&query_chars, &term_chars, max_distance) {
                    if d > 0 {
                        let term_len = term_chars.len() as f32;
                        let weight = FUZZY_WEIGHT * term_len / (term_len + d as f32);
                        keep_best(&mut matches, term, weight);
                    }
                }
            }
        }

        let mut matches: Vec<(&str, f32)> = matches.into_iter().collect();
        matches.sort_by(|a, b| a.0.cmp(b.0));
        matches
    }
}

fn keep_best<'a>(matches: &mut AHashMap<&'a str, f32>, term: &'a str, weight: f32) {
    let entry = matches.entry(term).or_insert(0.0);
    if weight > *entry {
        *entry = weight;
    }
}
