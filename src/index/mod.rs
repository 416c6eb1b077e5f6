//! Approximate string search over a fixed reference set.

pub mod qgram;

pub use qgram::{edit_distance, QGramIndex};
