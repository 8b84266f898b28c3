//! Transaction transformation.
//!
//! Applies a confirmed [`ColumnMapping`] to the data rows of a statement and
//! produces [`CanonicalTransaction`]s. Rows that cannot be turned into a
//! transaction are skipped and only counted; the run fails only when the
//! mapping lacks a required field or no row survives.

use crate::amount::parse_amount;
use crate::canonical_format::CanonicalStatement;
use crate::date::parse_date;
use crate::error::{Error, Result};
use crate::types::{CanonicalTransaction, ColumnMapping, Row, SemanticField};
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;
use tracing::{debug, info, warn};

/// Output of a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    /// Canonical records in input order.
    pub transactions: Vec<CanonicalTransaction>,
    /// Number of data rows that produced no record.
    pub skipped: usize,
}

impl Conversion {
    /// Render the records in the canonical CSV layout.
    pub fn to_csv(&self) -> Result<String> {
        CanonicalStatement::serialize(&self.transactions)
    }
}

/// Why a row produced no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SkipReason {
    ShortRow,
    InvalidDate,
    ZeroAmount,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::ShortRow => f.write_str("row shorter than mapped columns"),
            SkipReason::InvalidDate => f.write_str("unparseable date"),
            SkipReason::ZeroAmount => f.write_str("no debit or credit amount"),
        }
    }
}

/// Columns resolved from a mapping that has passed the required-field check.
struct ResolvedColumns {
    date: usize,
    debit: usize,
    credit: usize,
    description: Option<usize>,
    payee: Option<usize>,
    reference: Option<usize>,
    check_number: Option<usize>,
}

impl ResolvedColumns {
    fn resolve(mapping: &ColumnMapping) -> Result<Self> {
        let missing = mapping.missing_required();
        if !missing.is_empty() {
            return Err(Error::MissingColumns(missing));
        }

        let required = |field| {
            mapping
                .get(field)
                .ok_or_else(|| Error::MissingColumns(vec![field]))
        };

        Ok(Self {
            date: required(SemanticField::Date)?,
            debit: required(SemanticField::Debit)?,
            credit: required(SemanticField::Credit)?,
            description: mapping.get(SemanticField::Description),
            payee: mapping.get(SemanticField::Payee),
            reference: mapping.get(SemanticField::Reference),
            check_number: mapping.get(SemanticField::CheckNumber),
        })
    }

    /// Smallest row length that still holds every required column.
    fn min_row_len(&self) -> usize {
        self.date.max(self.debit).max(self.credit) + 1
    }
}

/// Turn data rows (the rows after the header) into canonical transactions.
///
/// Debits become negative amounts and credits positive ones. When a row has
/// both, the debit wins.
pub fn transform(rows: &[Row], mapping: &ColumnMapping) -> Result<Conversion> {
    let columns = ResolvedColumns::resolve(mapping)?;

    let mut transactions = Vec::with_capacity(rows.len());
    let mut skipped = 0;

    for (index, row) in rows.iter().enumerate() {
        match transform_row(row, &columns) {
            Ok(transaction) => transactions.push(transaction),
            Err(reason) => {
                debug!(row = index, %reason, "skipping row");
                skipped += 1;
            }
        }
    }

    if transactions.is_empty() {
        warn!(rows = rows.len(), "no row produced a transaction");
        return Err(Error::NoValidTransactions);
    }

    info!(
        transactions = transactions.len(),
        skipped, "converted statement rows"
    );

    Ok(Conversion {
        transactions,
        skipped,
    })
}

fn transform_row(
    row: &Row,
    columns: &ResolvedColumns,
) -> std::result::Result<CanonicalTransaction, SkipReason> {
    if row.len() < columns.min_row_len() {
        return Err(SkipReason::ShortRow);
    }

    let cell = |column: usize| row.get(column).unwrap_or_default();
    let optional = |column: Option<usize>| {
        column
            .and_then(|c| row.get(c))
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    };

    let date = parse_date(cell(columns.date)).map_err(|_| SkipReason::InvalidDate)?;
    let debit = parse_amount(cell(columns.debit));
    let credit = parse_amount(cell(columns.credit));

    let amount = signed_amount(debit, credit).ok_or(SkipReason::ZeroAmount)?;

    Ok(CanonicalTransaction {
        date,
        description: optional(columns.description),
        amount,
        payee: optional(columns.payee),
        reference: optional(columns.reference),
        check_number: optional(columns.check_number),
    })
}

/// Signed amount rounded to cents, or `None` when nothing positive remains.
fn signed_amount(debit: Decimal, credit: Decimal) -> Option<Decimal> {
    let raw = if debit > Decimal::ZERO {
        -debit
    } else if credit > Decimal::ZERO {
        credit
    } else {
        return None;
    };

    let mut amount = raw.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if amount.is_zero() {
        return None;
    }
    amount.rescale(2);
    Some(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn row(cells: &[&str]) -> Row {
        cells.iter().copied().collect()
    }

    fn mapping() -> ColumnMapping {
        ColumnMapping::new()
            .with(SemanticField::Date, 0)
            .unwrap()
            .with(SemanticField::Description, 1)
            .unwrap()
            .with(SemanticField::Debit, 2)
            .unwrap()
            .with(SemanticField::Credit, 3)
            .unwrap()
    }

    #[test]
    fn test_sign_convention() {
        let rows = vec![
            row(&["01/07/2023", "Rent", "50.00", "0"]),
            row(&["02/07/2023", "Salary", "0", "75"]),
            row(&["03/07/2023", "Nothing", "0", "0"]),
        ];
        let conversion = transform(&rows, &mapping()).unwrap();

        assert_eq!(conversion.transactions.len(), 2);
        assert_eq!(conversion.transactions[0].amount_string(), "-50.00");
        assert_eq!(conversion.transactions[1].amount_string(), "75.00");
        assert_eq!(conversion.skipped, 1);
    }

    #[test]
    fn test_debit_wins_when_both_present() {
        let rows = vec![row(&["01/07/2023", "Odd", "10", "20"])];
        let conversion = transform(&rows, &mapping()).unwrap();
        assert_eq!(conversion.transactions[0].amount_string(), "-10.00");
    }

    #[test]
    fn test_skips_bad_date_and_short_rows() {
        let rows = vec![
            row(&["31-Jul-23", "Coffee", "3.5", ""]),
            row(&["Closing balance", "", "", "100.00"]),
            row(&["01/08/2023", "Truncated"]),
        ];
        let conversion = transform(&rows, &mapping()).unwrap();

        assert_eq!(conversion.skipped, 2);
        assert_eq!(
            conversion.transactions,
            vec![CanonicalTransaction {
                date: NaiveDate::from_ymd_opt(2023, 7, 31).unwrap(),
                description: "Coffee".into(),
                amount: Decimal::new(-350, 2),
                payee: String::new(),
                reference: String::new(),
                check_number: String::new(),
            }]
        );
    }

    #[test]
    fn test_optional_columns_beyond_row_are_empty() {
        let m = mapping().with(SemanticField::Reference, 6).unwrap();
        let rows = vec![row(&["01/07/2023", " Shop ", "1,00", ""])];
        let conversion = transform(&rows, &m).unwrap();

        assert_eq!(conversion.transactions[0].description, "Shop");
        assert_eq!(conversion.transactions[0].reference, "");
    }

    #[test]
    fn test_rounds_to_cents() {
        assert_eq!(
            signed_amount(Decimal::new(12345, 3), Decimal::ZERO),
            Some(Decimal::new(-1235, 2))
        );
        assert_eq!(signed_amount(Decimal::new(1, 3), Decimal::ZERO), None);
        assert_eq!(signed_amount(Decimal::new(-5, 0), Decimal::ZERO), None);
    }

    #[test]
    fn test_missing_credit_column() {
        let m = mapping().without(SemanticField::Credit);
        let err = transform(&[], &m).unwrap_err();

        assert!(matches!(err, Error::MissingColumns(ref f) if f == &vec![SemanticField::Credit]));
        assert!(err.to_string().contains("Credit"));
    }

    #[test]
    fn test_nothing_survives() {
        let rows = vec![
            row(&["not a date", "", "1.00", ""]),
            row(&["01/07/2023", "", "", ""]),
        ];
        assert!(matches!(
            transform(&rows, &mapping()),
            Err(Error::NoValidTransactions)
        ));
    }
}
