use std::io::Read;

use anyhow::Result;

use crate::domain::{ClaimRows, OutstandingClaim};

/// Result of importing a claims table.
#[derive(Debug, Clone)]
pub struct ImportResult {
    pub claims: Vec<OutstandingClaim>,
    pub imported: usize,
    pub skipped: usize,
    pub errors: Vec<ImportError>,
}

/// A row that was skipped during import.
#[derive(Debug, Clone)]
pub struct ImportError {
    pub line: usize,
    pub error: String,
}

/// Importer for externally supplied outstanding-balance claims.
///
/// The input is spreadsheet provenance: rows are parsed one at a time and a
/// malformed row is recorded and skipped, never fatal to the batch.
pub struct ClaimImporter;

impl ClaimImporter {
    /// Import claims from a reader over raw delimited text.
    pub fn import<R: Read>(mut reader: R) -> Result<ImportResult> {
        let mut raw = String::new();
        reader.read_to_string(&mut raw)?;
        Ok(Self::import_str(&raw))
    }

    /// Import claims from an in-memory string.
    pub fn import_str(raw: &str) -> ImportResult {
        let mut claims = Vec::new();
        let mut errors = Vec::new();

        for row in ClaimRows::new(raw) {
            match row {
                Ok(claim) => claims.push(claim),
                Err(err) => errors.push(ImportError {
                    line: err.line(),
                    error: err.to_string(),
                }),
            }
        }

        ImportResult {
            imported: claims.len(),
            skipped: errors.len(),
            claims,
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_reports_skipped_rows() {
        let raw = "Name,Amount\nAcme Co,\"$1,200.50\"\nBad Row\n,abc\nBeta,300";
        let result = ClaimImporter::import_str(raw);

        assert_eq!(result.imported, 2);
        assert_eq!(result.skipped, 2);
        assert_eq!(result.claims[0].customer_name, "Acme Co");
        assert_eq!(result.claims[0].claimed_cents, 120050);
        assert_eq!(result.errors[0].line, 3);
        assert_eq!(result.errors[1].line, 4);
    }

    #[test]
    fn test_import_from_reader() {
        let raw = b"Acme,100\nBeta,200\n" as &[u8];
        let result = ClaimImporter::import(raw).unwrap();
        assert_eq!(result.imported, 2);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_empty_input_is_empty_batch() {
        let result = ClaimImporter::import_str("");
        assert_eq!(result.imported, 0);
        assert_eq!(result.skipped, 0);
    }
}
