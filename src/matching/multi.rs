use std::cmp::Reverse;
use std::collections::HashMap;
use std::hash::Hash;

use crate::core::types::{CacheStats, Uniqueness};
use crate::index::qgram::edit_distance;
use crate::matching::cache::{closest_match, MatchCache};

/// A resolved match with the reference length that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiHit<V> {
    pub value: V,
    pub reference: String,
    pub length: usize,
}

/// Match cache spanning references of heterogeneous length.
///
/// Partitions the catalog by barcode length into one [`MatchCache`] per
/// length and dispatches each query across them: an exact pass first (longest
/// length first, cheap), then an approximate pass (most common length first).
/// A truncation that equals its winning reference short-circuits both passes;
/// otherwise candidates from different lengths are re-ranked against the
/// full, untruncated query.
pub struct MultiLengthCache<V> {
    caches: HashMap<usize, MatchCache<V>>,
    /// distinct lengths, most references first
    frequency_order: Vec<usize>,
    /// distinct lengths, longest first
    descending_lengths: Vec<usize>,
    /// catalog value -> reference barcode across all lengths
    originals: HashMap<V, String>,
}

impl<V: Clone + Eq + Hash> MultiLengthCache<V> {
    #[must_use]
    pub fn new(catalog: HashMap<String, V>) -> Self {
        let originals: HashMap<V, String> = catalog
            .iter()
            .map(|(reference, value)| (value.clone(), reference.clone()))
            .collect();

        let mut length_counts: HashMap<usize, usize> = HashMap::new();
        for reference in catalog.keys() {
            if !reference.is_empty() {
                *length_counts.entry(reference.len()).or_default() += 1;
            }
        }

        let mut frequency_order: Vec<usize> = length_counts.keys().copied().collect();
        frequency_order.sort_by_key(|length| (Reverse(length_counts[length]), Reverse(*length)));

        let mut descending_lengths = frequency_order.clone();
        descending_lengths.sort_by_key(|length| Reverse(*length));

        if descending_lengths.len() > 1 {
            tracing::warn!(
                lengths = ?descending_lengths,
                "reference catalog mixes barcode lengths"
            );
        }

        let caches = descending_lengths
            .iter()
            .map(|&length| {
                let slice: HashMap<String, V> = catalog
                    .iter()
                    .filter(|(reference, _)| reference.len() == length)
                    .map(|(reference, value)| (reference.clone(), value.clone()))
                    .collect();
                (length, MatchCache::new(slice))
            })
            .collect();

        Self {
            caches,
            frequency_order,
            descending_lengths,
            originals,
        }
    }

    /// Resolve `barcode` against every reference length.
    ///
    /// The exact pass always runs first regardless of `max_distance`: a
    /// distance-0 resolution is strictly cheaper and cannot be improved upon.
    /// It runs with uniqueness disabled, since an exact truncation match is
    /// unambiguous by construction.
    pub fn search(
        &mut self,
        barcode: &str,
        max_distance: u32,
        uniqueness: Uniqueness,
    ) -> Option<MultiHit<V>> {
        if let Some(hit) = self.search_at(barcode, 0, Uniqueness::Any) {
            return Some(hit);
        }
        if max_distance == 0 {
            return None;
        }
        self.search_at(barcode, max_distance, uniqueness)
    }

    /// One pass over the per-length caches at a fixed distance bound
    fn search_at(
        &mut self,
        barcode: &str,
        max_distance: u32,
        uniqueness: Uniqueness,
    ) -> Option<MultiHit<V>> {
        let order = if max_distance == 0 {
            &self.descending_lengths
        } else {
            &self.frequency_order
        };

        let mut hits: Vec<MultiHit<V>> = Vec::new();
        for &length in order {
            let truncated = prefix(barcode, length);
            let Some(cache) = self.caches.get_mut(&length) else {
                continue;
            };
            let Some(hit) = cache.search(truncated, max_distance, uniqueness) else {
                continue;
            };
            if hit.reference == truncated {
                // perfect truncation match, no other length can beat it
                return Some(MultiHit {
                    value: hit.value,
                    reference: hit.reference,
                    length,
                });
            }
            hits.push(MultiHit {
                value: hit.value,
                reference: hit.reference,
                length,
            });
        }

        match hits.len() {
            0 => None,
            1 => hits.pop(),
            _ => {
                // hits from different lengths: re-rank the full, untruncated
                // barcode against each winning reference
                let references: Vec<String> =
                    hits.iter().map(|hit| hit.reference.clone()).collect();
                let closest = closest_match(barcode, &references, uniqueness)?.to_string();
                hits.into_iter().find(|hit| hit.reference == closest)
            }
        }
    }

    /// The reference barcode recorded for a catalog value
    #[must_use]
    pub fn original(&self, value: &V) -> Option<&str> {
        self.originals.get(value).map(String::as_str)
    }

    /// Distinct reference lengths, longest first
    #[must_use]
    pub fn lengths(&self) -> &[usize] {
        &self.descending_lengths
    }

    /// Counters summed over all per-length caches
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.caches
            .values()
            .map(MatchCache::stats)
            .fold(CacheStats::default(), |acc, stats| acc + stats)
    }

    /// Total number of references across all lengths
    #[must_use]
    pub fn len(&self) -> usize {
        self.caches.values().map(MatchCache::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.caches.is_empty()
    }
}

/// Truncate to a reference length, byte-safe for ASCII barcodes
pub(crate) fn prefix(barcode: &str, length: usize) -> &str {
    barcode.get(..length).unwrap_or(barcode)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity_cache(words: &[String]) -> MultiLengthCache<String> {
        MultiLengthCache::new(words.iter().map(|w| (w.clone(), w.clone())).collect())
    }

    fn letter_grid() -> Vec<String> {
        // two lengths per letter: "AAAAA", "AAAAAA", "BBBBB", ...
        "ABCDEFG"
            .chars()
            .flat_map(|c| {
                [
                    c.to_string().repeat(5),
                    c.to_string().repeat(6),
                ]
            })
            .collect()
    }

    #[test]
    fn test_exact_matches_across_lengths() {
        let mut cache = identity_cache(&letter_grid());

        for d in 0..4 {
            for c in "ABCDEFG".chars() {
                let five = c.to_string().repeat(5);
                let six = c.to_string().repeat(6);
                assert_eq!(
                    cache.search(&five, d, Uniqueness::Any).unwrap().value,
                    five
                );
                assert_eq!(cache.search(&six, d, Uniqueness::Any).unwrap().value, six);
            }
        }
    }

    #[test]
    fn test_longer_queries_truncate_to_longest() {
        let mut cache = identity_cache(&letter_grid());

        for d in 1..4 {
            for c in "ABCDEFG".chars() {
                let six = c.to_string().repeat(6);
                assert_eq!(
                    cache
                        .search(&c.to_string().repeat(7), d, Uniqueness::Any)
                        .unwrap()
                        .value,
                    six
                );
                assert_eq!(
                    cache
                        .search(&c.to_string().repeat(8), d, Uniqueness::Any)
                        .unwrap()
                        .value,
                    six
                );
            }
        }
    }

    #[test]
    fn test_no_match_outside_catalog() {
        let mut cache = identity_cache(&letter_grid());
        for i in 0..10 {
            assert_eq!(cache.search(&"T".repeat(i), 1, Uniqueness::Any), None);
        }
    }

    #[test]
    fn test_cross_length_rerank_prefers_closest_full_barcode() {
        let words = vec!["BAAAA".to_string(), "BAAAAA".to_string()];
        let mut cache = identity_cache(&words);

        let hit = cache.search("AAAAA", 1, Uniqueness::Any).unwrap();
        assert_eq!(hit.value, "BAAAA");
        assert_eq!(hit.reference, "BAAAA");
        assert_eq!(hit.length, 5);
    }

    #[test]
    fn test_exact_truncation_short_circuits() {
        let words = vec!["AAAAA".to_string(), "AAAAAT".to_string()];
        let mut cache = identity_cache(&words);

        // the length-6 truncation is the reference itself
        let hit = cache.search("AAAAAT", 2, Uniqueness::Required).unwrap();
        assert_eq!(hit.length, 6);
        assert_eq!(hit.reference, "AAAAAT");

        // longest length misses exactly, the length-5 truncation wins
        let hit = cache.search("AAAAAG", 2, Uniqueness::Required).unwrap();
        assert_eq!(hit.length, 5);
        assert_eq!(hit.reference, "AAAAA");

        // no cross-length tie-break ran: both resolutions were exact, so the
        // caches performed no winning index lookups
        assert_eq!(cache.stats().index_hits, 0);
    }

    #[test]
    fn test_distance_zero_skips_approximate_pass() {
        let words = vec!["ACGTA".to_string(), "TTTTT".to_string()];
        let mut cache = identity_cache(&words);

        assert_eq!(cache.search("ACGTT", 0, Uniqueness::Any), None);
        assert_eq!(
            cache.search("ACGTA", 0, Uniqueness::Any).unwrap().value,
            "ACGTA"
        );
    }

    #[test]
    fn test_unique_cross_length_tie_yields_nothing() {
        // one edit away from references of both lengths
        let words = vec!["CAAAA".to_string(), "AAAAAC".to_string()];
        let mut cache = identity_cache(&words);

        assert_eq!(cache.search("AAAAA", 1, Uniqueness::Required), None);
        let winner = cache.search("AAAAA", 1, Uniqueness::Any).unwrap();
        assert_eq!(winner.reference, "AAAAAC");
    }

    #[test]
    fn test_random_catalog_round_trip() {
        // a catalog of distinct 9-mers must resolve each member to itself at
        // any tolerance
        let bases = ["AAA", "CCC", "GGG", "TTT"];
        let words: Vec<String> = bases
            .iter()
            .flat_map(|a| bases.iter().map(move |b| format!("{a}{b}ACG")))
            .collect();
        let mut cache = identity_cache(&words);

        for word in &words {
            for d in 0..4 {
                assert_eq!(
                    cache.search(word, d, Uniqueness::Any).unwrap().value,
                    *word
                );
            }
        }
    }
}
