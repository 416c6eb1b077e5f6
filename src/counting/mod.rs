//! Read routing and count aggregation.
//!
//! One [`BarcodeCounter`] owns the whole counting pass:
//!
//! 1. **Tag classification**: the read's tag code picks an orientation
//! 2. **Multiplex routing** (optional): the multiplex code picks a sample
//! 3. **Payload matching**: the barcode goes to that sample's
//!    [`SampleCounter`], which shares a multi-length cache per orientation
//! 4. **Bookkeeping**: successful matches feed the per-orientation
//!    [`MismatchLedger`]s, from which a revised catalog is derived
//!
//! ## Example
//!
//! ```rust
//! use bartally::core::types::CatalogRow;
//! use bartally::counting::counter::BarcodeCounter;
//!
//! let rows = vec![CatalogRow::new("his3", "ACGTACGT", "TTGGCCAA")];
//! let mut counter = BarcodeCounter::new(rows, "UPT", "DNT").with_mismatch_tracking();
//!
//! // a clean read and a one-error read both count toward his3
//! counter.add("ACGTACGT", "UPT", 2, None).unwrap().unwrap();
//! counter.add("ACGTACGA", "UPT", 2, None).unwrap().unwrap();
//!
//! assert!(counter.count_table().contains("his3\t2\t0"));
//! ```

pub mod counter;
pub mod mismatch;
pub mod sample;

pub use counter::{BarcodeCounter, CountError};
pub use mismatch::MismatchLedger;
pub use sample::{BarcodeMatch, SampleCounter};
