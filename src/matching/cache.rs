use std::collections::HashMap;
use std::hash::Hash;

use crate::core::types::{CacheStats, Uniqueness};
use crate::index::qgram::{edit_distance, QGramIndex};

/// A resolved match: the catalog value and the reference barcode behind it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheHit<V> {
    pub value: V,
    pub reference: String,
}

/// Memoizing approximate-match cache over one reference index.
///
/// Maps observed barcodes to catalog values within a caller-supplied edit
/// distance. Every resolution (including "nothing matched") is memoized per
/// uniqueness mode, so repeated queries for the same noisy barcode skip the
/// index entirely. Memoized answers are re-validated against the distance
/// bound of each call, which may be tighter than the bound that produced them.
pub struct MatchCache<V> {
    /// reference barcode -> catalog value
    catalog: HashMap<String, V>,
    /// catalog value -> reference barcode, for distance re-validation
    originals: HashMap<V, String>,
    /// memo tables, one per uniqueness mode (indexed by `Uniqueness::index`)
    memo: [HashMap<String, Option<V>>; 2],
    index: QGramIndex,
    stats: CacheStats,
}

impl<V: Clone + Eq + Hash> MatchCache<V> {
    /// Build a cache over a reference -> value catalog slice.
    ///
    /// Both memo tables are seeded with the exact catalog entries, so a
    /// distance-0 query resolves without touching the index.
    #[must_use]
    pub fn new(catalog: HashMap<String, V>) -> Self {
        let originals: HashMap<V, String> = catalog
            .iter()
            .map(|(reference, value)| (value.clone(), reference.clone()))
            .collect();
        let seeded: HashMap<String, Option<V>> = catalog
            .iter()
            .map(|(reference, value)| (reference.clone(), Some(value.clone())))
            .collect();
        let index = QGramIndex::new(catalog.keys().cloned());

        Self {
            catalog,
            originals,
            memo: [seeded.clone(), seeded],
            index,
            stats: CacheStats::default(),
        }
    }

    /// Resolve `query` to a catalog value within `max_distance`.
    ///
    /// Returns `None` when nothing matches within the bound, or when the
    /// closest candidates tie and `uniqueness` is `Required`. Ties under
    /// `Required` are not memoized: a later `Any` call may still pick one of
    /// the tied candidates.
    pub fn search(
        &mut self,
        query: &str,
        max_distance: u32,
        uniqueness: Uniqueness,
    ) -> Option<CacheHit<V>> {
        self.stats.queries += 1;

        if let Some(memoized) = self.memo[uniqueness.index()].get(query) {
            let value = memoized.as_ref()?;
            let reference = &self.originals[value];
            // The memoized value is the closest known reference; if it does
            // not satisfy this call's bound, nothing else can.
            if edit_distance(query, reference) > max_distance {
                return None;
            }
            self.stats.cache_hits += 1;
            return Some(CacheHit {
                value: value.clone(),
                reference: reference.clone(),
            });
        }

        if max_distance == 0 {
            // Exact entries were seeded at construction; a memo miss at
            // distance 0 cannot be recovered by an index search.
            return None;
        }

        let candidates = self.index.search(query, max_distance);
        if candidates.is_empty() {
            self.memo[uniqueness.index()].insert(query.to_string(), None);
            return None;
        }

        let best = closest_match(query, &candidates, uniqueness)?;
        let value = self.catalog[best].clone();
        self.memo[uniqueness.index()].insert(query.to_string(), Some(value.clone()));
        self.stats.index_hits += 1;

        Some(CacheHit {
            value,
            reference: best.to_string(),
        })
    }

    /// Resolve `query` to its catalog value, discarding the matched reference
    pub fn resolve(&mut self, query: &str, max_distance: u32, uniqueness: Uniqueness) -> Option<V> {
        self.search(query, max_distance, uniqueness).map(|hit| hit.value)
    }

    /// The reference barcode recorded for a catalog value
    #[must_use]
    pub fn original(&self, value: &V) -> Option<&str> {
        self.originals.get(value).map(String::as_str)
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Number of references in the catalog slice
    #[must_use]
    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }
}

/// Pick the closest candidate by edit distance to `query`.
///
/// A tie for the minimum yields `None` under `Uniqueness::Required`;
/// otherwise the lexicographically smallest of the tied candidates wins, so
/// repeated calls are deterministic.
pub(crate) fn closest_match<'a>(
    query: &str,
    candidates: &'a [String],
    uniqueness: Uniqueness,
) -> Option<&'a str> {
    if candidates.len() == 1 {
        return Some(&candidates[0]);
    }

    let distances: Vec<u32> = candidates
        .iter()
        .map(|candidate| edit_distance(query, candidate))
        .collect();
    let minimum = *distances.iter().min()?;

    if uniqueness == Uniqueness::Required
        && distances.iter().filter(|&&d| d == minimum).count() > 1
    {
        return None;
    }

    candidates
        .iter()
        .zip(&distances)
        .filter(|(_, &d)| d == minimum)
        .map(|(candidate, _)| candidate.as_str())
        .min()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity_cache(words: &[&str]) -> MatchCache<String> {
        MatchCache::new(
            words
                .iter()
                .map(|w| ((*w).to_string(), (*w).to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_exact_and_close_matches() {
        let words: Vec<&str> = vec![
            "A",
            "AB",
            "ABC",
            "ABCD",
            "ABCDE",
            "ABCDEF",
            "ABCDEFG",
            "ABCDEFGH",
            "ABCDEFGHI",
            "ABCDEFGHIJ",
        ];
        let mut cache = identity_cache(&words);

        assert_eq!(cache.resolve("ABCDE", 0, Uniqueness::Any), Some("ABCDE".into()));
        assert_eq!(cache.resolve("ABCDE", 1, Uniqueness::Any), Some("ABCDE".into()));
        for d in 1..10 {
            assert_eq!(cache.resolve("ABGDE", d, Uniqueness::Any), Some("ABCDE".into()));
        }
        assert_eq!(cache.resolve("ABCDEFGHIJK", 0, Uniqueness::Any), None);
        assert_eq!(
            cache.resolve("ABCDEFGHIJK", 1, Uniqueness::Any),
            Some("ABCDEFGHIJ".into())
        );
    }

    #[test]
    fn test_counter_progression() {
        let mut cache = identity_cache(&["ACGTA", "ACGTT", "TTTTT"]);

        // catalog-exact query: memo hit, no index search
        cache.search("ACGTA", 1, Uniqueness::Any);
        assert_eq!(cache.stats().cache_hits, 1);
        assert_eq!(cache.stats().index_hits, 0);

        // noisy query: index resolves it once...
        cache.search("ACGAA", 1, Uniqueness::Required);
        assert_eq!(cache.stats().cache_hits, 1);
        assert_eq!(cache.stats().index_hits, 1);

        // ...and the memo answers it afterwards
        cache.search("ACGAA", 1, Uniqueness::Required);
        assert_eq!(cache.stats().cache_hits, 2);
        assert_eq!(cache.stats().index_hits, 1);

        // out-of-range query memoizes the miss without an index hit
        cache.search("GGGGG", 1, Uniqueness::Any);
        cache.search("GGGGG", 1, Uniqueness::Any);
        assert_eq!(cache.stats().cache_hits, 2);
        assert_eq!(cache.stats().index_hits, 1);
        assert_eq!(cache.stats().queries, 6);
    }

    #[test]
    fn test_cached_answer_revalidated_per_call() {
        let mut cache = identity_cache(&["AAAAA"]);

        // resolves at distance 2, memoized
        assert_eq!(cache.resolve("AATTA", 2, Uniqueness::Any), Some("AAAAA".into()));
        // the cached winner is two edits away, so a tighter bound rejects it
        assert_eq!(cache.resolve("AATTA", 1, Uniqueness::Any), None);
        // and the original bound still succeeds from the memo
        assert_eq!(cache.resolve("AATTA", 2, Uniqueness::Any), Some("AAAAA".into()));
        assert_eq!(cache.stats().cache_hits, 1);
    }

    #[test]
    fn test_uniqueness_tie_policy() {
        // "ACGTA" is one edit from both references
        let mut cache = identity_cache(&["ACGTT", "ACGTC"]);

        assert_eq!(cache.resolve("ACGTA", 1, Uniqueness::Required), None);
        // ties are not memoized under Required: Any still finds a winner...
        let winner = cache.resolve("ACGTA", 1, Uniqueness::Any);
        assert_eq!(winner, Some("ACGTC".into()));
        // ...and Required keeps refusing on its own memo table
        assert_eq!(cache.resolve("ACGTA", 1, Uniqueness::Required), None);
    }

    #[test]
    fn test_memo_tables_are_per_mode() {
        let mut cache = identity_cache(&["ACGTT", "ACGTC"]);

        assert_eq!(cache.resolve("ACGTA", 1, Uniqueness::Any), Some("ACGTC".into()));
        assert_eq!(cache.stats().index_hits, 1);

        // the Any memo entry must not answer a Required query
        assert_eq!(cache.resolve("ACGTA", 1, Uniqueness::Required), None);
        assert_eq!(cache.stats().cache_hits, 0);
    }

    #[test]
    fn test_cache_hit_reproduces_cold_answer() {
        let mut cache = identity_cache(&["ACGTA", "ACGTT", "TTTTT"]);

        let cold = cache.search("ACGAA", 2, Uniqueness::Any);
        let warm = cache.search("ACGAA", 2, Uniqueness::Any);
        assert_eq!(cold, warm);
        assert!(cold.is_some());
    }

    #[test]
    fn test_details_carry_matched_reference() {
        let mut cache = MatchCache::new(
            [("ACGTA".to_string(), "strain-1".to_string())]
                .into_iter()
                .collect(),
        );

        let hit = cache.search("ACGTT", 1, Uniqueness::Required).unwrap();
        assert_eq!(hit.value, "strain-1");
        assert_eq!(hit.reference, "ACGTA");
    }

    #[test]
    fn test_closest_match_tie_break() {
        let candidates = vec!["BAAAAA".to_string(), "BAAAA".to_string()];
        assert_eq!(
            closest_match("AAAAA", &candidates, Uniqueness::Any),
            Some("BAAAA")
        );
        assert_eq!(closest_match("AAAAA", &candidates, Uniqueness::Required), None);
    }
}
