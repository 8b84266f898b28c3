//! Canonical CSV format writer and reader.
//!
//! The canonical layout has a fixed header,
//! `*Date,Description,*Amount,Payee,Reference,Check Number`, where the starred
//! columns are mandatory for downstream consumers. Dates are `YYYY-MM-DD` and
//! amounts carry exactly two fraction digits, negative for debits.

use crate::amount::parse_amount;
use crate::date::parse_date;
use crate::error::{Error, Result};
use crate::types::CanonicalTransaction;
use csv::{Reader, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// Header line of the canonical format, in column order.
pub const CANONICAL_HEADER: [&str; 6] = [
    "*Date",
    "Description",
    "*Amount",
    "Payee",
    "Reference",
    "Check Number",
];

/// A set of canonical transactions ready to be written or just read back.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CanonicalStatement {
    /// Transactions in output order.
    pub transactions: Vec<CanonicalTransaction>,
}

/// Canonical CSV record structure.
#[derive(Debug, Serialize, Deserialize)]
struct CanonicalRecord {
    #[serde(rename = "*Date")]
    date: String,
    #[serde(rename = "Description", default)]
    description: String,
    #[serde(rename = "*Amount")]
    amount: String,
    #[serde(rename = "Payee", default)]
    payee: String,
    #[serde(rename = "Reference", default)]
    reference: String,
    #[serde(rename = "Check Number", default)]
    check_number: String,
}

impl From<&CanonicalTransaction> for CanonicalRecord {
    fn from(transaction: &CanonicalTransaction) -> Self {
        Self {
            date: transaction.date_string(),
            description: transaction.description.clone(),
            amount: transaction.amount_string(),
            payee: transaction.payee.clone(),
            reference: transaction.reference.clone(),
            check_number: transaction.check_number.clone(),
        }
    }
}

impl CanonicalStatement {
    /// Parse canonical CSV from any source implementing `Read`.
    ///
    /// # Examples
    ///
    /// ```
    /// use statement_normalizer::canonical_format::CanonicalStatement;
    ///
    /// let text = "*Date,Description,*Amount,Payee,Reference,Check Number\n\
    ///             2023-07-31,Coffee,-3.50,,,\n";
    /// let statement = CanonicalStatement::from_read(&mut text.as_bytes())?;
    /// assert_eq!(statement.transactions[0].amount_string(), "-3.50");
    /// # Ok::<(), statement_normalizer::Error>(())
    /// ```
    pub fn from_read<R: Read>(reader: &mut R) -> Result<Self> {
        let mut csv_reader = Reader::from_reader(reader);
        let mut transactions = Vec::new();

        for result in csv_reader.deserialize() {
            let record: CanonicalRecord = result?;

            let mut amount = parse_amount(&record.amount);
            amount.rescale(2);

            transactions.push(CanonicalTransaction {
                date: parse_date(&record.date)?,
                description: record.description,
                amount,
                payee: record.payee,
                reference: record.reference,
                check_number: record.check_number,
            });
        }

        Ok(Self { transactions })
    }

    /// Write the statement as canonical CSV to any destination implementing `Write`.
    ///
    /// The header line is written even when there are no transactions.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let mut csv_writer = WriterBuilder::new().has_headers(false).from_writer(writer);

        csv_writer.write_record(CANONICAL_HEADER)?;
        for transaction in &self.transactions {
            csv_writer.serialize(CanonicalRecord::from(transaction))?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Render `transactions` as canonical CSV text.
    pub fn serialize(transactions: &[CanonicalTransaction]) -> Result<String> {
        let statement = CanonicalStatement {
            transactions: transactions.to_vec(),
        };
        let mut buffer = Vec::new();
        statement.write_to(&mut buffer)?;
        String::from_utf8(buffer).map_err(|e| Error::ParseError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    fn transaction(description: &str, cents: i64) -> CanonicalTransaction {
        CanonicalTransaction {
            date: NaiveDate::from_ymd_opt(2023, 7, 31).unwrap(),
            description: description.to_string(),
            amount: Decimal::new(cents, 2),
            payee: "ACME, Inc.".to_string(),
            reference: String::new(),
            check_number: "0042".to_string(),
        }
    }

    #[test]
    fn test_serialize_header_and_quoting() {
        let text = CanonicalStatement::serialize(&[
            transaction("Coffee", -350),
            transaction("Said \"hi\"\nthen left", 7500),
        ])
        .unwrap();

        assert_eq!(
            text,
            "*Date,Description,*Amount,Payee,Reference,Check Number\n\
             2023-07-31,Coffee,-3.50,\"ACME, Inc.\",,0042\n\
             2023-07-31,\"Said \"\"hi\"\"\nthen left\",75.00,\"ACME, Inc.\",,0042\n"
        );
    }

    #[test]
    fn test_empty_statement_still_has_header() {
        let text = CanonicalStatement::serialize(&[]).unwrap();
        assert_eq!(text, "*Date,Description,*Amount,Payee,Reference,Check Number\n");
    }

    #[test]
    fn test_read_back_written_output() {
        let original = vec![transaction("Coffee", -350), transaction("Salary", 250000)];
        let text = CanonicalStatement::serialize(&original).unwrap();

        let parsed = CanonicalStatement::from_read(&mut text.as_bytes()).unwrap();
        assert_eq!(parsed.transactions, original);
    }

    #[test]
    fn test_read_rejects_bad_date() {
        let text = "*Date,Description,*Amount,Payee,Reference,Check Number\nyesterday,x,1.00,,,\n";
        assert!(CanonicalStatement::from_read(&mut text.as_bytes()).is_err());
    }
}
