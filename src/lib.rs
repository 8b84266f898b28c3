//! Bank Statement Normalizer Library
//!
//! A library for turning heterogeneous bank-statement CSV exports into one
//! canonical transaction format.
//!
//! # Pipeline
//!
//! - **Ingestion**: delimited text into a [`RawTable`]
//! - **Header location**: the first row mentioning both debit and credit
//! - **Classification**: candidate columns per [`SemanticField`], never auto-selected
//! - **Transformation**: a confirmed [`ColumnMapping`] into [`CanonicalTransaction`]s
//! - **Serialization**: the canonical `*Date,Description,*Amount,...` CSV layout
//!
//! # Examples
//!
//! ## Converting a statement
//!
//! ```
//! use statement_normalizer::{ColumnMapping, PreparedStatement, SemanticField};
//!
//! let text = "My Bank\nDate,Details,Debit,Credit\n31-Jul-23,Coffee,3.50,\n";
//! let prepared = PreparedStatement::from_text(text, None)?;
//!
//! // Candidates are only suggestions; the caller confirms each column.
//! let debit = prepared.suggestions().candidates(SemanticField::Debit)[0].column;
//! let mapping = ColumnMapping::new()
//!     .with(SemanticField::Date, 0)?
//!     .with(SemanticField::Description, 1)?
//!     .with(SemanticField::Debit, debit)?
//!     .with(SemanticField::Credit, 3)?;
//!
//! let conversion = prepared.convert(&mapping)?;
//! assert_eq!(
//!     conversion.to_csv()?,
//!     "*Date,Description,*Amount,Payee,Reference,Check Number\n2023-07-31,Coffee,-3.50,,,\n"
//! );
//! # Ok::<(), statement_normalizer::Error>(())
//! ```

pub mod error;
pub mod types;
pub mod table;
pub mod header;
pub mod classifier;
pub mod date;
pub mod amount;
pub mod transform;
pub mod canonical_format;
pub mod pipeline;

// Re-export commonly used types
pub use classifier::{classify, ColumnSuggestions, PatternSet};
pub use error::{Error, Result};
pub use header::{locate_header, split_at_header};
pub use pipeline::PreparedStatement;
pub use transform::{transform, Conversion};
pub use types::{
    CanonicalTransaction, ColumnMapping, ColumnMatch, HeaderCell, HeaderRow, RawTable, Row,
    SemanticField,
};

/// Render canonical transactions as CSV text.
pub fn serialize(transactions: &[CanonicalTransaction]) -> Result<String> {
    canonical_format::CanonicalStatement::serialize(transactions)
}
