//! Parsers for catalog, multiplex, and sequencing read files.
//!
//! - [`catalog`]: tab-delimited reference catalogs and multiplex sample
//!   sheets
//! - [`reads`]: lazy iteration over FASTQ/FASTA/QSEQ/TXT sequence files,
//!   with transparent gzip decompression

pub mod catalog;
pub mod reads;
