//! Core data types shared across the matching and counting layers.

pub mod types;
