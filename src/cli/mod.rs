//! Command-line interface for bartally.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **count**: Count barcode reads against a reference catalog
//! - **catalog**: Validate and summarize a reference catalog
//!
//! ## Usage
//!
//! ```text
//! # Count reads, tolerating up to two errors per barcode
//! bartally count reads.fastq --catalog barcodes.tsv --output counts.tsv \
//!     --up-code GATGTCCACGAGGTCTCT --down-code CGGTGTCGGTCTCGTAGC \
//!     --max-distance 2
//!
//! # Track observed variants and write a revised catalog
//! bartally count reads.fastq.gz -c barcodes.tsv -o counts.tsv \
//!     --up-code GATGTCCACGAGGTCTCT --down-code CGGTGTCGGTCTCGTAGC \
//!     --mismatch-out mismatches.tsv --revised-out revised.tsv
//!
//! # Per-sample counting with a multiplex sample sheet
//! bartally count lane1.qseq -c barcodes.tsv -o counts.tsv \
//!     --up-code GATGTCCACGAGGTCTCT --down-code CGGTGTCGGTCTCGTAGC \
//!     --multiplex samples.tsv
//!
//! # Inspect a catalog
//! bartally catalog barcodes.tsv --format json
//! ```

use clap::{Parser, Subcommand};

pub mod catalog;
pub mod count;

#[derive(Parser)]
#[command(name = "bartally")]
#[command(version)]
#[command(about = "Count DNA barcode reads against a reference catalog")]
#[command(
    long_about = "bartally resolves short noisy barcode reads to known reference barcodes under a bounded edit-distance tolerance and aggregates per-strain counts.\n\nEach read is expected to carry a fixed tag code (selecting the uptag or downtag orientation), optionally a multiplex barcode (selecting the sample), and the strain barcode itself. Matching tolerates sequencing errors up to the configured edit distance, and observed variants can be fed back into a revised catalog."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format for the run summary
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Count barcode reads against a reference catalog
    Count(count::CountArgs),

    /// Validate and summarize a reference catalog
    Catalog(catalog::CatalogArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
