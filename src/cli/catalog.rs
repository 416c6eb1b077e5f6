use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use anyhow::Context;
use itertools::Itertools;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::core::types::CatalogRow;
use crate::parsing::catalog::parse_catalog_file;

#[derive(clap::Args)]
pub struct CatalogArgs {
    /// Tab-delimited reference catalog (name, uptag, downtag)
    pub catalog: PathBuf,
}

/// Shape summary of a reference catalog
#[derive(Debug, Serialize)]
pub struct CatalogSummary {
    pub rows: usize,
    pub strains: usize,
    /// (barcode length, reference count), most common first
    pub up_tag_lengths: Vec<(usize, usize)>,
    pub down_tag_lengths: Vec<(usize, usize)>,
    pub duplicate_up_tags: usize,
    pub duplicate_down_tags: usize,
}

impl CatalogSummary {
    #[must_use]
    pub fn from_rows(rows: &[CatalogRow]) -> Self {
        let strains = rows.iter().map(|row| row.name.as_str()).unique().count();

        Self {
            rows: rows.len(),
            strains,
            up_tag_lengths: length_histogram(rows.iter().map(|row| row.up_tag.as_str())),
            down_tag_lengths: length_histogram(rows.iter().map(|row| row.down_tag.as_str())),
            duplicate_up_tags: duplicates(rows.iter().map(|row| row.up_tag.as_str())),
            duplicate_down_tags: duplicates(rows.iter().map(|row| row.down_tag.as_str())),
        }
    }
}

fn length_histogram<'a>(tags: impl Iterator<Item = &'a str>) -> Vec<(usize, usize)> {
    let mut counts: HashMap<usize, usize> = HashMap::new();
    for tag in tags {
        *counts.entry(tag.len()).or_default() += 1;
    }
    counts
        .into_iter()
        .sorted_by_key(|&(length, count)| (std::cmp::Reverse(count), length))
        .collect()
}

fn duplicates<'a>(tags: impl Iterator<Item = &'a str>) -> usize {
    let mut seen = HashSet::new();
    tags.filter(|tag| !seen.insert(*tag)).count()
}

pub fn run(args: CatalogArgs, format: OutputFormat, _verbose: bool) -> anyhow::Result<()> {
    let rows = parse_catalog_file(&args.catalog)
        .with_context(|| format!("reading catalog {}", args.catalog.display()))?;
    let summary = CatalogSummary::from_rows(&rows);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Text | OutputFormat::Tsv => {
            println!("rows\t{}", summary.rows);
            println!("strains\t{}", summary.strains);
            for (length, count) in &summary.up_tag_lengths {
                println!("uptag length {length}\t{count}");
            }
            for (length, count) in &summary.down_tag_lengths {
                println!("downtag length {length}\t{count}");
            }
            println!("duplicate uptags\t{}", summary.duplicate_up_tags);
            println!("duplicate downtags\t{}", summary.duplicate_down_tags);
        }
    }

    Ok(())
}
