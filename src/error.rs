//! Error types for the statement normalizer.

use crate::types::SemanticField;
use std::io;
use thiserror::Error;

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while normalizing a statement.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error occurred during read or write operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error parsing or writing CSV.
    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    /// No row mentions both "debit" and "credit".
    #[error("Could not find a header row containing both \"debit\" and \"credit\" columns")]
    HeaderNotFound,

    /// One or more required fields have no confirmed column.
    #[error("Please map the required columns: {}", display_names(.0))]
    MissingColumns(Vec<SemanticField>),

    /// Invalid date format.
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    /// Every row was skipped.
    #[error("No valid transactions found in the file")]
    NoValidTransactions,

    /// Unknown semantic field name.
    #[error("Unknown field: {0}")]
    InvalidField(String),

    /// A column mapping that cannot be applied to the table.
    #[error("Invalid column mapping: {0}")]
    InvalidMapping(String),

    /// General parsing error.
    #[error("Parse error: {0}")]
    ParseError(String),
}

fn display_names(fields: &[SemanticField]) -> String {
    fields
        .iter()
        .map(|f| f.display_name())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message_uses_display_names() {
        let err = Error::MissingColumns(vec![SemanticField::Debit, SemanticField::Credit]);
        assert_eq!(err.to_string(), "Please map the required columns: Debit, Credit");
    }
}
