//! Approximate barcode matching with memoization.
//!
//! This module provides the resolution layer between noisy reads and the
//! reference catalog:
//!
//! - [`MatchCache`]: memoizing cache over one reference index
//! - [`MultiLengthCache`]: dispatch across references of heterogeneous length
//!
//! ## Resolution Algorithm
//!
//! 1. **Memo lookup**: prior resolutions (including misses) answer repeated
//!    queries, re-validated against the distance bound of each call
//! 2. **Index search**: unseen queries go to the q-gram index; the closest
//!    candidate wins, ties resolved by the uniqueness policy
//! 3. **Multi-length dispatch**: an exact pass over all lengths (longest
//!    first), then an approximate pass (most common length first), with
//!    cross-length candidates re-ranked against the untruncated query
//!
//! ## Example
//!
//! ```rust
//! use bartally::core::types::Uniqueness;
//! use bartally::matching::multi::MultiLengthCache;
//!
//! let catalog = [
//!     ("ACGTACGT".to_string(), "his3".to_string()),
//!     ("TTGGCCAA".to_string(), "ura3".to_string()),
//! ];
//! let mut cache = MultiLengthCache::new(catalog.into_iter().collect());
//!
//! let hit = cache.search("ACGTACGA", 1, Uniqueness::Required).unwrap();
//! assert_eq!(hit.value, "his3");
//! assert_eq!(hit.reference, "ACGTACGT");
//! ```

pub mod cache;
pub mod multi;

pub use cache::{CacheHit, MatchCache};
pub use multi::{MultiHit, MultiLengthCache};
