use std::path::Path;

use thiserror::Error;

use crate::core::types::{CatalogRow, MultiplexRow};

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid catalog: {0}")]
    InvalidFormat(String),
}

/// Parse a tab-delimited catalog file with columns: name, uptag, downtag
///
/// # Errors
///
/// Returns `CatalogError::Io` if the file cannot be read, or
/// `CatalogError::InvalidFormat` if the content is invalid.
pub fn parse_catalog_file(path: &Path) -> Result<Vec<CatalogRow>, CatalogError> {
    let content = std::fs::read_to_string(path)?;
    parse_catalog_text(&content)
}

/// Parse tab-delimited catalog text with columns: name, uptag, downtag
///
/// Empty lines and `#` comments are skipped; an optional header line
/// starting with `strain` or `name` is recognized. Row order is preserved.
///
/// # Errors
///
/// Returns `CatalogError::InvalidFormat` if a line does not have exactly 3
/// fields or no rows are found.
pub fn parse_catalog_text(text: &str) -> Result<Vec<CatalogRow>, CatalogError> {
    let mut rows = Vec::new();
    let mut first_data_line = true;

    for (i, line) in text.lines().enumerate() {
        let line = line.trim_end();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();

        if first_data_line {
            first_data_line = false;
            let first = fields[0].trim().to_lowercase();
            if first == "strain" || first == "name" {
                continue;
            }
        }

        // Line numbers in errors are 1-based for user friendliness
        let line_num = i + 1;

        if fields.len() != 3 {
            return Err(CatalogError::InvalidFormat(format!(
                "Line {line_num} has {} fields, expected 3 (name, uptag, downtag)",
                fields.len()
            )));
        }

        rows.push(CatalogRow::new(
            fields[0].trim(),
            fields[1].trim(),
            fields[2].trim(),
        ));
    }

    if rows.is_empty() {
        return Err(CatalogError::InvalidFormat(
            "No rows found in catalog".to_string(),
        ));
    }

    Ok(rows)
}

/// Parse a tab-delimited multiplex sample sheet with columns: sample, barcode
///
/// # Errors
///
/// Returns `CatalogError::Io` if the file cannot be read, or
/// `CatalogError::InvalidFormat` if the content is invalid.
pub fn parse_multiplex_file(path: &Path) -> Result<Vec<MultiplexRow>, CatalogError> {
    let content = std::fs::read_to_string(path)?;
    parse_multiplex_text(&content)
}

/// Parse tab-delimited multiplex text with columns: sample, barcode
///
/// # Errors
///
/// Returns `CatalogError::InvalidFormat` if a line does not have exactly 2
/// fields or no rows are found.
pub fn parse_multiplex_text(text: &str) -> Result<Vec<MultiplexRow>, CatalogError> {
    let mut rows = Vec::new();
    let mut first_data_line = true;

    for (i, line) in text.lines().enumerate() {
        let line = line.trim_end();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();

        if first_data_line {
            first_data_line = false;
            let first = fields[0].trim().to_lowercase();
            if first == "sample" || first == "name" {
                continue;
            }
        }

        let line_num = i + 1;

        if fields.len() != 2 {
            return Err(CatalogError::InvalidFormat(format!(
                "Line {line_num} has {} fields, expected 2 (sample, barcode)",
                fields.len()
            )));
        }

        rows.push(MultiplexRow::new(fields[0].trim(), fields[1].trim()));
    }

    if rows.is_empty() {
        return Err(CatalogError::InvalidFormat(
            "No rows found in multiplex sample sheet".to_string(),
        ));
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_catalog_text() {
        let tsv = "his3\tACGTACGT\tTTGGCCAA\nura3\tGGGGCCCC\tAATTAATT\n";

        let rows = parse_catalog_text(tsv).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "his3");
        assert_eq!(rows[0].up_tag, "ACGTACGT");
        assert_eq!(rows[1].down_tag, "AATTAATT");
    }

    #[test]
    fn test_parse_catalog_with_header_and_comments() {
        let tsv = "# deletion collection v2\n\nStrain\tUptag\tDowntag\nhis3\tACGT\tTTGG\n";

        let rows = parse_catalog_text(tsv).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "his3");
    }

    #[test]
    fn test_parse_catalog_preserves_order() {
        let tsv = "b\tAA\tCC\na\tGG\tTT\n";
        let rows = parse_catalog_text(tsv).unwrap();
        assert_eq!(rows[0].name, "b");
        assert_eq!(rows[1].name, "a");
    }

    #[test]
    fn test_parse_catalog_wrong_field_count() {
        let err = parse_catalog_text("his3\tACGT\n").unwrap_err();
        assert!(err.to_string().contains("Line 1"));
        assert!(err.to_string().contains("expected 3"));
    }

    #[test]
    fn test_parse_catalog_empty() {
        assert!(parse_catalog_text("").is_err());
        assert!(parse_catalog_text("# only comments\n").is_err());
    }

    #[test]
    fn test_parse_multiplex_text() {
        let tsv = "sample\tbarcode\ns1\tAAAA\ns2\tTTTT\n";

        let rows = parse_multiplex_text(tsv).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].sample, "s1");
        assert_eq!(rows[0].barcode, "AAAA");
        assert_eq!(rows[1].sample, "s2");
    }

    #[test]
    fn test_parse_multiplex_wrong_field_count() {
        let err = parse_multiplex_text("s1\tAAAA\textra\n").unwrap_err();
        assert!(err.to_string().contains("expected 2"));
    }
}
