//! Title identifier input
//!
//! One identifier per line; for CSV exports only the first column counts.
//! Identifiers may carry the `tt` title prefix, which is stripped. A first
//! row that is not an identifier is taken as a header and skipped.

use crate::tagger::MOVIE_PREFIX;
use medoc_common::{Error, Result};
use std::path::Path;
use tracing::{debug, info};

/// Read and normalize identifiers from a file
pub async fn read_id_file(path: &Path) -> Result<Vec<String>> {
    let content = tokio::fs::read_to_string(path).await?;
    let ids = parse_ids(&content);

    if ids.is_empty() {
        return Err(Error::InvalidInput(format!(
            "No title identifiers in {}",
            path.display()
        )));
    }

    info!(path = %path.display(), count = ids.len(), "Loaded title identifiers");
    Ok(ids)
}

/// Normalize identifiers from text, skipping blanks and a header row
pub fn parse_ids(content: &str) -> Vec<String> {
    let mut ids = Vec::new();
    let mut first_row = true;

    for line in content.lines() {
        let cell = first_column(line);
        if cell.is_empty() {
            continue;
        }
        if std::mem::take(&mut first_row) && !looks_like_id(cell) {
            debug!(header = %line.trim(), "Skipping header row");
            continue;
        }
        ids.push(strip_prefix(cell).to_string());
    }

    ids
}

fn first_column(line: &str) -> &str {
    line.split(',')
        .next()
        .unwrap_or_default()
        .trim()
        .trim_matches('"')
        .trim()
}

fn looks_like_id(cell: &str) -> bool {
    let digits = cell.strip_prefix(MOVIE_PREFIX).unwrap_or(cell);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

fn strip_prefix(cell: &str) -> &str {
    cell.strip_prefix(MOVIE_PREFIX).unwrap_or(cell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_csv_export_with_header() {
        let content = "Const,Your Rating,Title\ntt0133093,10,The Matrix\ntt0234215,7,The Matrix Reloaded\n";
        assert_eq!(parse_ids(content), vec!["0133093", "0234215"]);
    }

    #[test]
    fn test_plain_list_without_header() {
        let content = "0133093\n\n  tt9999999  \n";
        assert_eq!(parse_ids(content), vec!["0133093", "9999999"]);
    }

    #[test]
    fn test_header_after_blank_lines() {
        let content = "\n  \nConst,Title\ntt0133093,The Matrix\n";
        assert_eq!(parse_ids(content), vec!["0133093"]);
    }

    #[test]
    fn test_only_first_row_can_be_header() {
        let content = "tt0133093\nnot-an-id\n";
        assert_eq!(parse_ids(content), vec!["0133093", "not-an-id"]);
    }

    #[test]
    fn test_quoted_cells() {
        assert_eq!(parse_ids("\"tt0133093\",\"x\"\n"), vec!["0133093"]);
    }

    #[test]
    fn test_leading_zeros_kept() {
        assert_eq!(parse_ids("tt0000001"), vec!["0000001"]);
    }

    #[tokio::test]
    async fn test_read_file() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "tt0133093\ntt9999999\n").unwrap();

        assert_eq!(read_id_file(file.path()).await.unwrap(), vec!["0133093", "9999999"]);
    }

    #[tokio::test]
    async fn test_header_only_file_is_rejected() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "Const,Title\n").unwrap();

        assert!(matches!(read_id_file(file.path()).await, Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let result = read_id_file(Path::new("/nonexistent/medoc/ids.csv")).await;
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
