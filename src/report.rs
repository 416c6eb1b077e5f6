//! Run summary rendering.
//!
//! The count, mismatch, and revised-catalog tables are produced by
//! [`BarcodeCounter`](crate::counting::counter::BarcodeCounter); this module
//! renders the end-of-run summary in the CLI's output formats.

use serde::Serialize;

use crate::cli::OutputFormat;

/// Attempted vs. matched read totals for one counting pass
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RunSummary {
    pub total: u64,
    pub matched: u64,
    pub fraction: f64,
}

impl RunSummary {
    #[must_use]
    pub fn new(total: u64, matched: u64) -> Self {
        let fraction = if total == 0 {
            0.0
        } else {
            matched as f64 / total as f64
        };
        Self {
            total,
            matched,
            fraction,
        }
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.total == 0 {
            write!(f, "-")
        } else {
            write!(f, "{}\t{:.5}", self.total, self.fraction)
        }
    }
}

/// Render the summary in the requested output format
#[must_use]
pub fn render_summary(summary: &RunSummary, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format!(
            "{} reads, {} matched ({:.1}%)",
            summary.total,
            summary.matched,
            summary.fraction * 100.0
        ),
        OutputFormat::Tsv => summary.to_string(),
        OutputFormat::Json => serde_json::to_string_pretty(summary)
            .unwrap_or_else(|_| summary.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_fraction() {
        let summary = RunSummary::new(4, 3);
        assert_eq!(summary.fraction, 0.75);
        assert_eq!(summary.to_string(), "4\t0.75000");
    }

    #[test]
    fn test_empty_run_renders_dash() {
        let summary = RunSummary::new(0, 0);
        assert_eq!(summary.to_string(), "-");
        assert_eq!(render_summary(&summary, OutputFormat::Tsv), "-");
    }

    #[test]
    fn test_render_formats() {
        let summary = RunSummary::new(10, 5);
        assert_eq!(
            render_summary(&summary, OutputFormat::Text),
            "10 reads, 5 matched (50.0%)"
        );

        let json = render_summary(&summary, OutputFormat::Json);
        assert!(json.contains("\"total\": 10"));
        assert!(json.contains("\"matched\": 5"));
    }
}
