//! Header row location.
//!
//! Bank exports often open with titles, account metadata and blank separator
//! lines. The transaction table starts at the first row that mentions both a
//! debit and a credit column.

use crate::error::{Error, Result};
use crate::types::{HeaderRow, RawTable, Row};
use tracing::info;

/// Index of the first row whose lower-cased cells, joined, contain both
/// `"debit"` and `"credit"`.
pub fn locate_header(table: &RawTable) -> Result<usize> {
    table
        .rows()
        .iter()
        .position(is_header_row)
        .ok_or(Error::HeaderNotFound)
}

/// Locate the header and split the table into the header and the rows after it.
pub fn split_at_header(table: &RawTable) -> Result<(HeaderRow, Vec<Row>)> {
    let index = locate_header(table)?;
    let header = HeaderRow::from_row(&table.rows()[index]);
    let rows = table.rows()[index + 1..].to_vec();

    info!(
        header_row = index,
        columns = header.cells().len(),
        data_rows = rows.len(),
        "located header row"
    );

    Ok((header, rows))
}

fn is_header_row(row: &Row) -> bool {
    let joined = row.cells().collect::<Vec<_>>().join(" ").to_lowercase();
    joined.contains("debit") && joined.contains("credit")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[&[&str]]) -> RawTable {
        RawTable::new(rows.iter().map(|r| r.iter().copied().collect()).collect())
    }

    #[test]
    fn test_skips_preamble() {
        let t = table(&[
            &["ACME Bank"],
            &["Account", "12345678"],
            &["Date", "Narrative", "Debit Amount", "Credit Amount"],
            &["31-Jul-23", "Coffee", "3.50", ""],
        ]);
        assert_eq!(locate_header(&t).unwrap(), 2);
    }

    #[test]
    fn test_first_qualifying_row_wins() {
        let t = table(&[
            &["Debit", "Credit"],
            &["Date", "Debit", "Credit"],
        ]);
        assert_eq!(locate_header(&t).unwrap(), 0);
    }

    #[test]
    fn test_tokens_may_sit_in_one_cell() {
        let t = table(&[&["Date", "DEBIT/CREDIT"]]);
        assert_eq!(locate_header(&t).unwrap(), 0);
    }

    #[test]
    fn test_requires_both_tokens() {
        let t = table(&[
            &["Date", "Description", "Debit"],
            &["Date", "Amount", "Credit"],
        ]);
        assert!(matches!(locate_header(&t), Err(Error::HeaderNotFound)));
        assert!(matches!(
            locate_header(&RawTable::default()),
            Err(Error::HeaderNotFound)
        ));
    }

    #[test]
    fn test_split_at_header() {
        let t = table(&[
            &["Statement"],
            &["Date", "", "Debit", "Credit"],
            &["01/02/2023", "x", "1.00", ""],
        ]);
        let (header, rows) = split_at_header(&t).unwrap();

        assert_eq!(header.cells().len(), 3);
        assert_eq!(header.column_of("Debit"), Some(2));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get(0), Some("01/02/2023"));
    }
}
