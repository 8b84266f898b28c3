//! Common types shared by the pipeline stages.

use crate::error::{Error, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// One row of tabular input, cells in column order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    cells: Vec<String>,
}

impl Row {
    /// Create a row from its cells.
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    /// Cell at `column`, or `None` past the end of the row.
    pub fn get(&self, column: usize) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    /// Number of cells in the row.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the row has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether every cell is empty after trimming.
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.trim().is_empty())
    }

    /// Iterate over the cells.
    pub fn cells(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for Row {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

/// Tokenized tabular input. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawTable {
    rows: Vec<Row>,
}

impl RawTable {
    /// Create a table from already-tokenized rows.
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// All rows in input order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A non-empty header cell and the column it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    /// Zero-based column index within the raw table.
    pub column: usize,
    /// Trimmed header text.
    pub text: String,
}

/// The row naming the columns of the transaction table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeaderRow {
    cells: Vec<HeaderCell>,
}

impl HeaderRow {
    /// Build a header from a raw row, dropping empty cells but keeping the
    /// original column index of every surviving cell.
    pub fn from_row(row: &Row) -> Self {
        let cells = row
            .cells()
            .enumerate()
            .filter_map(|(column, text)| {
                let text = text.trim();
                (!text.is_empty()).then(|| HeaderCell {
                    column,
                    text: text.to_string(),
                })
            })
            .collect();
        Self { cells }
    }

    /// Header cells in column order.
    pub fn cells(&self) -> &[HeaderCell] {
        &self.cells
    }

    /// Header text of a column, if that column has a non-empty header.
    pub fn text_of(&self, column: usize) -> Option<&str> {
        self.cells
            .iter()
            .find(|c| c.column == column)
            .map(|c| c.text.as_str())
    }

    /// Column whose header text equals `text`, ignoring case and surrounding whitespace.
    pub fn column_of(&self, text: &str) -> Option<usize> {
        let wanted = text.trim().to_lowercase();
        self.cells
            .iter()
            .find(|c| c.text.to_lowercase() == wanted)
            .map(|c| c.column)
    }
}

/// Target concept a column may represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SemanticField {
    /// Transaction date.
    Date,
    /// Free-text narrative.
    Description,
    /// Money out.
    Debit,
    /// Money in.
    Credit,
    /// Counterparty.
    Payee,
    /// Bank reference.
    Reference,
    /// Cheque number.
    CheckNumber,
}

impl SemanticField {
    /// Every field, in presentation order.
    pub const ALL: [SemanticField; 7] = [
        SemanticField::Date,
        SemanticField::Description,
        SemanticField::Debit,
        SemanticField::Credit,
        SemanticField::Payee,
        SemanticField::Reference,
        SemanticField::CheckNumber,
    ];

    /// Fields the transformer cannot run without.
    pub const REQUIRED: [SemanticField; 3] = [
        SemanticField::Date,
        SemanticField::Debit,
        SemanticField::Credit,
    ];

    /// Whether the field must be mapped before converting.
    pub fn is_required(&self) -> bool {
        Self::REQUIRED.contains(self)
    }

    /// Human-readable name used in messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            SemanticField::Date => "Date",
            SemanticField::Description => "Description",
            SemanticField::Debit => "Debit",
            SemanticField::Credit => "Credit",
            SemanticField::Payee => "Payee",
            SemanticField::Reference => "Reference",
            SemanticField::CheckNumber => "Check Number",
        }
    }
}

impl FromStr for SemanticField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "date" => Ok(SemanticField::Date),
            "description" => Ok(SemanticField::Description),
            "debit" => Ok(SemanticField::Debit),
            "credit" => Ok(SemanticField::Credit),
            "payee" => Ok(SemanticField::Payee),
            "reference" => Ok(SemanticField::Reference),
            "checknumber" | "check_number" | "check number" | "check-number" => {
                Ok(SemanticField::CheckNumber)
            }
            _ => Err(Error::InvalidField(s.to_string())),
        }
    }
}

impl fmt::Display for SemanticField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A candidate association between a field and a header column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMatch {
    /// Field the column may hold.
    pub field: SemanticField,
    /// Zero-based column index.
    pub column: usize,
    /// Header text of the column.
    pub header: String,
}

/// Confirmed association of fields to columns.
///
/// Each field maps to at most one column and each column serves at most one
/// field. Values are never changed in place: [`ColumnMapping::with`] returns a
/// new mapping.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnMapping {
    columns: BTreeMap<SemanticField, usize>,
}

impl ColumnMapping {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy with `field` assigned to `column`, replacing any previous
    /// column for that field.
    pub fn with(&self, field: SemanticField, column: usize) -> Result<Self> {
        if let Some((other, _)) = self
            .columns
            .iter()
            .find(|(f, c)| **f != field && **c == column)
        {
            return Err(Error::InvalidMapping(format!(
                "column {} is already mapped to {}",
                column, other
            )));
        }

        let mut columns = self.columns.clone();
        columns.insert(field, column);
        Ok(Self { columns })
    }

    /// Return a copy without `field`.
    pub fn without(&self, field: SemanticField) -> Self {
        let mut columns = self.columns.clone();
        columns.remove(&field);
        Self { columns }
    }

    /// Return a copy extended with the entries of `suggested` whose field and
    /// column are both still free here. Existing entries are never replaced.
    pub fn filled_from(&self, suggested: &ColumnMapping) -> Self {
        let mut columns = self.columns.clone();
        for (field, column) in suggested.iter() {
            if !columns.contains_key(&field) && !columns.values().any(|c| *c == column) {
                columns.insert(field, column);
            }
        }
        Self { columns }
    }

    /// Column confirmed for `field`.
    pub fn get(&self, field: SemanticField) -> Option<usize> {
        self.columns.get(&field).copied()
    }

    /// Required fields with no confirmed column, in Date, Debit, Credit order.
    pub fn missing_required(&self) -> Vec<SemanticField> {
        SemanticField::REQUIRED
            .iter()
            .copied()
            .filter(|f| !self.columns.contains_key(f))
            .collect()
    }

    /// Confirmed pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (SemanticField, usize)> + '_ {
        self.columns.iter().map(|(f, c)| (*f, *c))
    }

    /// Whether nothing has been confirmed yet.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// A normalized transaction, independent of the source layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalTransaction {
    /// Transaction date.
    pub date: NaiveDate,

    /// Narrative, possibly empty.
    pub description: String,

    /// Signed amount with two fraction digits: negative for debits, positive for credits.
    pub amount: Decimal,

    /// Counterparty, possibly empty.
    pub payee: String,

    /// Bank reference, possibly empty.
    pub reference: String,

    /// Cheque number, possibly empty.
    pub check_number: String,
}

impl CanonicalTransaction {
    /// Date as `YYYY-MM-DD`.
    pub fn date_string(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// Amount with exactly two fraction digits.
    pub fn amount_string(&self) -> String {
        format!("{:.2}", self.amount)
    }
}
