use serde::{Deserialize, Serialize};

/// Which tag column of the catalog a read belongs to.
///
/// Deletion-collection constructs carry two tags per strain; a read's tag
/// code selects one of the two before the payload barcode is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Up,
    Down,
}

impl Orientation {
    pub const BOTH: [Orientation; 2] = [Orientation::Up, Orientation::Down];

    /// Position of this orientation in per-orientation arrays
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Up => 0,
            Self::Down => 1,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// How a tie among equally close candidates is resolved.
///
/// `Required` treats a tie as "no match"; `Any` picks a deterministic winner.
/// The two modes memoize independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Uniqueness {
    Required,
    Any,
}

impl Uniqueness {
    /// Position of this mode's memo table
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Required => 0,
            Self::Any => 1,
        }
    }
}

/// One catalog line: a strain name and its two orientation barcodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRow {
    pub name: String,
    pub up_tag: String,
    pub down_tag: String,
}

impl CatalogRow {
    pub fn new(
        name: impl Into<String>,
        up_tag: impl Into<String>,
        down_tag: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            up_tag: up_tag.into(),
            down_tag: down_tag.into(),
        }
    }

    /// The catalog barcode for the given orientation
    #[must_use]
    pub fn tag(&self, orientation: Orientation) -> &str {
        match orientation {
            Orientation::Up => &self.up_tag,
            Orientation::Down => &self.down_tag,
        }
    }
}

/// One multiplex sample-sheet line: a sample name and its multiplex barcode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiplexRow {
    pub sample: String,
    pub barcode: String,
}

impl MultiplexRow {
    pub fn new(sample: impl Into<String>, barcode: impl Into<String>) -> Self {
        Self {
            sample: sample.into(),
            barcode: barcode.into(),
        }
    }
}

/// Counters kept by each match cache.
///
/// `index_hits` counts index searches that produced a winner; re-validated
/// memo answers count as `cache_hits`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub queries: u64,
    pub cache_hits: u64,
    pub index_hits: u64,
}

impl std::ops::Add for CacheStats {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            queries: self.queries + other.queries,
            cache_hits: self.cache_hits + other.cache_hits,
            index_hits: self.index_hits + other.index_hits,
        }
    }
}

impl std::ops::AddAssign for CacheStats {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation_labels() {
        assert_eq!(Orientation::Up.label(), "UP");
        assert_eq!(Orientation::Down.label(), "DOWN");
        assert_eq!(Orientation::Up.to_string(), "UP");
    }

    #[test]
    fn test_orientation_indexing() {
        let ledgers = ["up", "down"];
        assert_eq!(ledgers[Orientation::Up.index()], "up");
        assert_eq!(ledgers[Orientation::Down.index()], "down");
    }

    #[test]
    fn test_catalog_row_tag() {
        let row = CatalogRow::new("his3", "ACGT", "TTGG");
        assert_eq!(row.tag(Orientation::Up), "ACGT");
        assert_eq!(row.tag(Orientation::Down), "TTGG");
    }

    #[test]
    fn test_cache_stats_sum() {
        let a = CacheStats {
            queries: 3,
            cache_hits: 1,
            index_hits: 2,
        };
        let b = CacheStats {
            queries: 1,
            cache_hits: 1,
            index_hits: 0,
        };
        let sum = a + b;
        assert_eq!(sum.queries, 4);
        assert_eq!(sum.cache_hits, 2);
        assert_eq!(sum.index_hits, 2);
    }
}
