//! # bartally
//!
//! A library for counting DNA barcode reads against a reference catalog.
//!
//! Pooled fitness screens tag every strain with short DNA barcodes. Reads
//! coming off the sequencer are noisy: a barcode may arrive with substitutions,
//! insertions, or deletions, and catalogs often mix barcode lengths. `bartally`
//! resolves each read to its catalog entry under a bounded edit-distance
//! tolerance and aggregates per-strain counts.
//!
//! ## Features
//!
//! - **Edit-distance matching**: q-gram filtered Levenshtein search against
//!   the catalog
//! - **Memoized resolution**: every observed barcode is resolved once and
//!   answered from a cache afterwards
//! - **Multi-length catalogs**: reads are truncated and matched against every
//!   reference length, with cross-length re-ranking
//! - **Uniqueness policy**: ambiguous matches never silently increment counts
//! - **Mismatch tracking**: observed variants feed a revised catalog
//! - **Multiplexing**: an extra barcode layer routes reads to per-sample
//!   counters
//!
//! ## Example
//!
//! ```rust
//! use bartally::core::types::CatalogRow;
//! use bartally::counting::counter::BarcodeCounter;
//!
//! let rows = vec![
//!     CatalogRow::new("his3", "ACGTACGT", "TTGGCCAA"),
//!     CatalogRow::new("ura3", "GGGGCCCC", "AATTAATT"),
//! ];
//! let mut counter = BarcodeCounter::new(rows, "UPT", "DNT").with_mismatch_tracking();
//!
//! // tag code "UPT" routes the read to the uptag catalog
//! let hit = counter.add("ACGTACGA", "UPT", 2, None).unwrap().unwrap();
//! assert_eq!(hit.value, "his3");
//! assert_eq!(hit.reference, "ACGTACGT");
//!
//! println!("{}", counter.count_table());
//! ```
//!
//! ## Modules
//!
//! - [`index`]: q-gram filtered edit-distance search
//! - [`matching`]: memoizing match caches and multi-length dispatch
//! - [`counting`]: read routing, counting, and mismatch ledgers
//! - [`parsing`]: catalog, multiplex, and sequencing read parsers
//! - [`report`]: run summary rendering
//! - [`cli`]: command-line interface implementation

pub mod cli;
pub mod core;
pub mod counting;
pub mod index;
pub mod matching;
pub mod parsing;
pub mod report;

// Re-export commonly used types for convenience
pub use crate::core::types::{CatalogRow, MultiplexRow, Orientation, Uniqueness};
pub use crate::counting::counter::{BarcodeCounter, CountError};
pub use crate::counting::sample::{BarcodeMatch, SampleCounter};
pub use crate::index::qgram::{edit_distance, QGramIndex};
pub use crate::matching::cache::MatchCache;
pub use crate::matching::multi::MultiLengthCache;
