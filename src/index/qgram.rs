//! Q-gram filtered edit-distance search.
//!
//! Builds a 2-gram inverted index over a fixed set of reference strings and
//! answers "which references are within edit distance d of this query".
//! Candidates that cannot share enough grams with the query are skipped; the
//! survivors are verified with an exact Levenshtein computation.

use std::collections::HashMap;

use bio::alignment::distance::levenshtein;

/// Gram width used by the count filter
pub const GRAM_SIZE: usize = 2;

/// Exact Levenshtein edit distance (unit-cost insert/delete/substitute)
#[must_use]
pub fn edit_distance(a: &str, b: &str) -> u32 {
    levenshtein(a.as_bytes(), b.as_bytes())
}

/// Inverted 2-gram index over a reference set.
///
/// References may have mixed lengths; sharing one length keeps the candidate
/// filter tight but is not required for correctness.
#[derive(Debug)]
pub struct QGramIndex {
    references: Vec<String>,
    grams: HashMap<[u8; GRAM_SIZE], Vec<usize>>,
}

impl QGramIndex {
    pub fn new<I, S>(references: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let references: Vec<String> = references.into_iter().map(Into::into).collect();
        let mut grams: HashMap<[u8; GRAM_SIZE], Vec<usize>> = HashMap::new();

        for (i, reference) in references.iter().enumerate() {
            for gram in reference.as_bytes().windows(GRAM_SIZE) {
                grams.entry([gram[0], gram[1]]).or_default().push(i);
            }
        }

        Self { references, grams }
    }

    /// All references within `max_distance` of `query`, in insertion order.
    ///
    /// Two strings within edit distance d share at least
    /// `(max_len - GRAM_SIZE + 1) - GRAM_SIZE * d` grams; references below
    /// that bound are rejected without a distance computation. When the bound
    /// degenerates (short strings or a large d) every reference is verified.
    #[must_use]
    pub fn search(&self, query: &str, max_distance: u32) -> Vec<String> {
        let mut shared: HashMap<usize, usize> = HashMap::new();
        for gram in query.as_bytes().windows(GRAM_SIZE) {
            if let Some(postings) = self.grams.get(&[gram[0], gram[1]]) {
                for &i in postings {
                    *shared.entry(i).or_default() += 1;
                }
            }
        }

        let mut hits = Vec::new();
        for (i, reference) in self.references.iter().enumerate() {
            if reference.len().abs_diff(query.len()) > max_distance as usize {
                continue;
            }

            let longest = reference.len().max(query.len()) as isize;
            let threshold = longest - (GRAM_SIZE as isize - 1)
                - GRAM_SIZE as isize * max_distance as isize;
            if threshold >= 1 && shared.get(&i).copied().unwrap_or(0) < threshold as usize {
                continue;
            }

            if edit_distance(query, reference) <= max_distance {
                hits.push(reference.clone());
            }
        }

        hits
    }

    /// Number of references in the index
    #[must_use]
    pub fn len(&self) -> usize {
        self.references.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }
}
