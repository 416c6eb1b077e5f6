use std::path::PathBuf;

use anyhow::{bail, Context};

use crate::cli::OutputFormat;
use crate::counting::counter::BarcodeCounter;
use crate::parsing::catalog::{parse_catalog_file, parse_multiplex_file};
use crate::parsing::reads::{ReadsFormat, SequenceReader};
use crate::report::render_summary;

#[derive(clap::Args)]
pub struct CountArgs {
    /// Sequence reads: FASTQ, FASTA, QSEQ, or one sequence per line
    /// (optionally gzipped)
    pub reads: PathBuf,

    /// Tab-delimited reference catalog (name, uptag, downtag)
    #[arg(short, long)]
    pub catalog: PathBuf,

    /// Write the per-strain count table here
    #[arg(short, long)]
    pub output: PathBuf,

    /// Tag code marking an uptag read
    #[arg(long)]
    pub up_code: String,

    /// Tag code marking a downtag read
    #[arg(long)]
    pub down_code: String,

    /// Maximum edit distance when matching strain barcodes
    #[arg(short = 'm', long, default_value_t = 2)]
    pub max_distance: u32,

    /// Override reads format detection
    #[arg(long, value_enum)]
    pub reads_format: Option<ReadsFormat>,

    /// Multiplex sample sheet (sample, barcode); enables per-sample counting
    #[arg(long)]
    pub multiplex: Option<PathBuf>,

    /// Write observed barcode variants per strain here
    #[arg(long)]
    pub mismatch_out: Option<PathBuf>,

    /// Write a catalog revised to the most frequent observed variants here
    #[arg(long)]
    pub revised_out: Option<PathBuf>,
}

pub fn run(args: CountArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    if args.up_code.len() != args.down_code.len() {
        bail!(
            "up and down tag codes must have the same length ({} vs {})",
            args.up_code.len(),
            args.down_code.len()
        );
    }
    let tag_len = args.up_code.len();

    let rows = parse_catalog_file(&args.catalog)
        .with_context(|| format!("reading catalog {}", args.catalog.display()))?;
    let mut counter = BarcodeCounter::new(rows, &args.up_code, &args.down_code);

    if args.mismatch_out.is_some() || args.revised_out.is_some() {
        counter = counter.with_mismatch_tracking();
    }

    let multiplex_len = match &args.multiplex {
        Some(path) => {
            let samples = parse_multiplex_file(path)
                .with_context(|| format!("reading multiplex sample sheet {}", path.display()))?;
            let len = samples[0].barcode.len();
            if samples.iter().any(|s| s.barcode.len() != len) {
                bail!("multiplex barcodes must share one length");
            }
            counter = counter.with_multiplex(samples);
            len
        }
        None => 0,
    };
    let prefix_len = tag_len + multiplex_len;

    let reader = SequenceReader::from_path(&args.reads, args.reads_format)
        .with_context(|| format!("opening reads {}", args.reads.display()))?;

    let mut skipped = 0u64;
    for sequence in reader {
        let sequence = sequence?;
        if sequence.len() < prefix_len || !sequence.is_ascii() {
            skipped += 1;
            continue;
        }

        let tag_code = &sequence[..tag_len];
        let multiplex_code = (multiplex_len > 0).then(|| &sequence[tag_len..prefix_len]);
        let barcode = &sequence[prefix_len..];
        counter.add(barcode, tag_code, args.max_distance, multiplex_code)?;
    }
    if skipped > 0 {
        tracing::warn!(skipped, "skipped reads shorter than the tag/multiplex prefix");
    }

    std::fs::write(&args.output, counter.count_table())
        .with_context(|| format!("writing counts to {}", args.output.display()))?;
    if let Some(path) = &args.mismatch_out {
        std::fs::write(path, counter.mismatch_table()?)
            .with_context(|| format!("writing mismatches to {}", path.display()))?;
    }
    if let Some(path) = &args.revised_out {
        std::fs::write(path, counter.revised_catalog()?)
            .with_context(|| format!("writing revised catalog to {}", path.display()))?;
    }

    if verbose {
        let stats = counter.cache_stats();
        tracing::debug!(
            queries = stats.queries,
            cache_hits = stats.cache_hits,
            index_hits = stats.index_hits,
            "cache statistics"
        );
    }

    println!("{}", render_summary(&counter.summary(), format));

    Ok(())
}
