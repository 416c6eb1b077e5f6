use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::core::types::Uniqueness;
use crate::matching::multi::{MultiHit, MultiLengthCache};

/// A multi-length cache shared by every counter searching the same
/// orientation
pub type SharedCache = Rc<RefCell<MultiLengthCache<String>>>;

/// A counted barcode resolution: strain name, matched reference, and the
/// reference length the read was truncated to
pub type BarcodeMatch = MultiHit<String>;

/// Running counts for one bucket (one tag orientation within one sample).
///
/// Matching is delegated to the shared cache; only the counts are owned here.
pub struct SampleCounter {
    name: Option<String>,
    cache: SharedCache,
    counts: HashMap<String, u64>,
}

impl SampleCounter {
    #[must_use]
    pub fn new(cache: SharedCache) -> Self {
        Self {
            name: None,
            cache,
            counts: HashMap::new(),
        }
    }

    #[must_use]
    pub fn named(cache: SharedCache, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            cache,
            counts: HashMap::new(),
        }
    }

    /// Match `barcode` and, on success, increment its strain's count.
    ///
    /// Always requires a unique winner: an ambiguous match must never
    /// silently increment a count.
    pub fn add(&mut self, barcode: &str, max_distance: u32) -> Option<BarcodeMatch> {
        let hit = self
            .cache
            .borrow_mut()
            .search(barcode, max_distance, Uniqueness::Required)?;
        *self.counts.entry(hit.value.clone()).or_insert(0) += 1;
        Some(hit)
    }

    /// Occurrences counted for a strain name
    #[must_use]
    pub fn count(&self, name: &str) -> u64 {
        self.counts.get(name).copied().unwrap_or(0)
    }

    /// Sum of all counts in this bucket
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}
