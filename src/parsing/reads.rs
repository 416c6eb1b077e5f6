//! Lazy iteration over sequencing read files.
//!
//! Yields one sequence string per record from FASTQ, FASTA, QSEQ, or
//! plain-text files. Supports gzip/bgzip compressed input.
//!
//! Supported extensions (optionally followed by `.gz`/`.bgz`):
//! - `.fastq`, `.fq`
//! - `.fasta`, `.fa`, `.fna`
//! - `.qseq`
//! - `.txt`

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::GzDecoder;
use noodles::{fasta, fastq};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReadsError {
    #[error("Failed to read sequences: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid record: {0}")]
    InvalidFormat(String),

    #[error("Cannot detect reads format from file name: {0}")]
    UnknownFormat(String),
}

/// On-disk layout of a reads file
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReadsFormat {
    /// 4-line records, sequence on the second line
    Fastq,
    /// `>`-headed records with multi-line sequences
    Fasta,
    /// tab-delimited Illumina QSEQ, sequence in column 9
    Qseq,
    /// one sequence per line
    Txt,
}

impl ReadsFormat {
    /// Detect the format from a file name, ignoring a trailing `.gz`/`.bgz`
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())?;
        let name = name
            .strip_suffix(".gz")
            .or_else(|| name.strip_suffix(".bgz"))
            .unwrap_or(&name);

        if name.ends_with(".fastq") || name.ends_with(".fq") {
            Some(Self::Fastq)
        } else if name.ends_with(".fasta") || name.ends_with(".fa") || name.ends_with(".fna") {
            Some(Self::Fasta)
        } else if name.ends_with(".qseq") {
            Some(Self::Qseq)
        } else if name.ends_with(".txt") {
            Some(Self::Txt)
        } else {
            None
        }
    }
}

/// Check if the path is a gzipped file
fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

enum Inner {
    Fastq(fastq::io::Reader<Box<dyn BufRead>>),
    Fasta(fasta::io::Reader<Box<dyn BufRead>>),
    Qseq(Box<dyn BufRead>),
    Txt(Box<dyn BufRead>),
}

/// One-record-per-step sequence iterator over any supported format
pub struct SequenceReader {
    inner: Inner,
}

impl SequenceReader {
    /// Open a reads file, decompressing and detecting the format as needed
    ///
    /// # Errors
    ///
    /// Returns `ReadsError::UnknownFormat` if no format was supplied and the
    /// file name does not reveal one, or `ReadsError::Io` if the file cannot
    /// be opened.
    pub fn from_path(path: &Path, format: Option<ReadsFormat>) -> Result<Self, ReadsError> {
        let format = format
            .or_else(|| ReadsFormat::from_path(path))
            .ok_or_else(|| ReadsError::UnknownFormat(path.display().to_string()))?;

        let file = File::open(path)?;
        let reader: Box<dyn BufRead> = if is_gzipped(path) {
            Box::new(BufReader::new(GzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        };

        Ok(Self::new(reader, format))
    }

    /// Wrap an open reader in the given format
    #[must_use]
    pub fn new(reader: Box<dyn BufRead>, format: ReadsFormat) -> Self {
        let inner = match format {
            ReadsFormat::Fastq => Inner::Fastq(fastq::io::Reader::new(reader)),
            ReadsFormat::Fasta => Inner::Fasta(fasta::io::Reader::new(reader)),
            ReadsFormat::Qseq => Inner::Qseq(reader),
            ReadsFormat::Txt => Inner::Txt(reader),
        };
        Self { inner }
    }
}

impl Iterator for SequenceReader {
    type Item = Result<String, ReadsError>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            Inner::Fastq(reader) => {
                let mut record = fastq::Record::default();
                match reader.read_record(&mut record) {
                    Ok(0) => None,
                    Ok(_) => Some(Ok(String::from_utf8_lossy(record.sequence()).into_owned())),
                    Err(e) => Some(Err(ReadsError::Io(e))),
                }
            }
            Inner::Fasta(reader) => match reader.records().next()? {
                Ok(record) => Some(Ok(
                    String::from_utf8_lossy(record.sequence().as_ref()).into_owned()
                )),
                Err(e) => Some(Err(ReadsError::Io(e))),
            },
            Inner::Qseq(reader) => {
                let line = next_line(reader)?;
                Some(line.and_then(|l| {
                    l.split('\t').nth(8).map(str::to_string).ok_or_else(|| {
                        ReadsError::InvalidFormat(
                            "QSEQ line has fewer than 9 fields".to_string(),
                        )
                    })
                }))
            }
            Inner::Txt(reader) => next_line(reader),
        }
    }
}

/// Read one line, stripping the trailing line ending
fn next_line(reader: &mut impl BufRead) -> Option<Result<String, ReadsError>> {
    let mut line = String::new();
    match reader.read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => {
            while line.ends_with('\n') || line.ends_with('\r') {
                line.pop();
            }
            Some(Ok(line))
        }
        Err(e) => Some(Err(ReadsError::Io(e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;

    fn reader_over(content: &str, format: ReadsFormat) -> SequenceReader {
        let cursor: Box<dyn BufRead> = Box::new(Cursor::new(content.to_string().into_bytes()));
        SequenceReader::new(cursor, format)
    }

    fn collect_sequences(reader: SequenceReader) -> Vec<String> {
        reader.map(|r| r.unwrap()).collect()
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(
            ReadsFormat::from_path(Path::new("reads.fastq")),
            Some(ReadsFormat::Fastq)
        );
        assert_eq!(
            ReadsFormat::from_path(Path::new("reads.fq.gz")),
            Some(ReadsFormat::Fastq)
        );
        assert_eq!(
            ReadsFormat::from_path(Path::new("/data/Reads.FA")),
            Some(ReadsFormat::Fasta)
        );
        assert_eq!(
            ReadsFormat::from_path(Path::new("lane1.qseq")),
            Some(ReadsFormat::Qseq)
        );
        assert_eq!(
            ReadsFormat::from_path(Path::new("barcodes.txt.bgz")),
            Some(ReadsFormat::Txt)
        );
        assert_eq!(ReadsFormat::from_path(Path::new("reads.bam")), None);
    }

    #[test]
    fn test_fastq_sequences() {
        let fastq = "@r1\nACGT\n+\nIIII\n@r2\nTTGG\n+\nIIII\n";
        let sequences = collect_sequences(reader_over(fastq, ReadsFormat::Fastq));
        assert_eq!(sequences, vec!["ACGT", "TTGG"]);
    }

    #[test]
    fn test_fasta_multiline_sequences() {
        let fasta = ">r1 first\nACGT\nACGT\n>r2\nGGGG\n";
        let sequences = collect_sequences(reader_over(fasta, ReadsFormat::Fasta));
        assert_eq!(sequences, vec!["ACGTACGT", "GGGG"]);
    }

    #[test]
    fn test_qseq_column_extraction() {
        let qseq = "m\t1\t1\t1\t0\t0\t0\t1\tACGTACGT\tIIIIIIII\t1\n\
                    m\t1\t1\t1\t0\t0\t0\t1\tTTTTGGGG\tIIIIIIII\t1\n";
        let sequences = collect_sequences(reader_over(qseq, ReadsFormat::Qseq));
        assert_eq!(sequences, vec!["ACGTACGT", "TTTTGGGG"]);
    }

    #[test]
    fn test_qseq_short_line_is_an_error() {
        let mut reader = reader_over("only\tthree\tfields\n", ReadsFormat::Qseq);
        assert!(reader.next().unwrap().is_err());
    }

    #[test]
    fn test_txt_lines() {
        let txt = "ACGT\nTTGG\r\nAAAA";
        let sequences = collect_sequences(reader_over(txt, ReadsFormat::Txt));
        assert_eq!(sequences, vec!["ACGT", "TTGG", "AAAA"]);
    }

    #[test]
    fn test_from_path_with_gzip() {
        let fastq = b"@r1\nACGT\n+\nIIII\n";
        let mut encoder =
            flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(fastq).unwrap();
        let compressed = encoder.finish().unwrap();

        let mut temp = NamedTempFile::with_suffix(".fastq.gz").unwrap();
        temp.write_all(&compressed).unwrap();
        temp.flush().unwrap();

        let reader = SequenceReader::from_path(temp.path(), None).unwrap();
        assert_eq!(collect_sequences(reader), vec!["ACGT"]);
    }

    #[test]
    fn test_from_path_unknown_format() {
        let temp = NamedTempFile::with_suffix(".bam").unwrap();
        let result = SequenceReader::from_path(temp.path(), None);
        assert!(matches!(result, Err(ReadsError::UnknownFormat(_))));
    }

    #[test]
    fn test_format_override_beats_detection() {
        let mut temp = NamedTempFile::with_suffix(".dat").unwrap();
        temp.write_all(b"ACGT\n").unwrap();
        temp.flush().unwrap();

        let reader =
            SequenceReader::from_path(temp.path(), Some(ReadsFormat::Txt)).unwrap();
        assert_eq!(collect_sequences(reader), vec!["ACGT"]);
    }
}
