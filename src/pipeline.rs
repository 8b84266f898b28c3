//! End-to-end conversion pipeline.
//!
//! Each stage takes the previous stage's value and returns a new one. The
//! prepared statement is never mutated: confirming a mapping and converting
//! produce fresh values, so the same statement can be converted again with a
//! different mapping.

use crate::classifier::{classify, ColumnSuggestions, PatternSet};
use crate::error::{Error, Result};
use crate::header::split_at_header;
use crate::transform::{transform, Conversion};
use crate::types::{ColumnMapping, HeaderRow, RawTable, Row};
use tracing::warn;

/// A statement whose header has been located and whose columns have been classified.
#[derive(Debug, Clone)]
pub struct PreparedStatement {
    header: HeaderRow,
    rows: Vec<Row>,
    suggestions: ColumnSuggestions,
}

impl PreparedStatement {
    /// Run ingestion, header location and classification with the default patterns.
    pub fn from_text(text: &str, delimiter: Option<u8>) -> Result<Self> {
        let table = RawTable::from_text(text, delimiter)?;
        Self::from_table(&table, &PatternSet::default())
    }

    /// Locate the header in an already tokenized table and classify its columns.
    pub fn from_table(table: &RawTable, patterns: &PatternSet) -> Result<Self> {
        let (header, rows) = split_at_header(table).inspect_err(|e| warn!("{}", e))?;
        let suggestions = classify(&header, patterns);

        Ok(Self {
            header,
            rows,
            suggestions,
        })
    }

    /// The located header row.
    pub fn header(&self) -> &HeaderRow {
        &self.header
    }

    /// Data rows following the header.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Candidate columns per field.
    pub fn suggestions(&self) -> &ColumnSuggestions {
        &self.suggestions
    }

    /// Convert the data rows with a confirmed mapping.
    ///
    /// Every mapped column must be one of the header's non-empty columns.
    pub fn convert(&self, mapping: &ColumnMapping) -> Result<Conversion> {
        for (field, column) in mapping.iter() {
            if self.header.text_of(column).is_none() {
                return Err(Error::InvalidMapping(format!(
                    "{} is mapped to column {}, which has no header",
                    field, column
                )));
            }
        }

        transform(&self.rows, mapping).inspect_err(|e| warn!("{}", e))
    }
}
