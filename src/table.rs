//! Tabular ingestion.
//!
//! Turns delimited text into a [`RawTable`]. Quoting follows RFC 4180; rows may
//! have differing lengths and blank lines are dropped.

use crate::error::Result;
use crate::types::{RawTable, Row};
use csv::ReaderBuilder;
use std::io::Read;
use tracing::debug;

const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];
const SNIFF_RECORDS: usize = 10;

impl RawTable {
    /// Parse delimited text into a table.
    ///
    /// When `delimiter` is `None` it is guessed from the first records of the input.
    ///
    /// # Examples
    ///
    /// ```
    /// use statement_normalizer::RawTable;
    ///
    /// let table = RawTable::from_text("Date;Debit;Credit\n01/02/2023;5,00;\n", None)?;
    /// assert_eq!(table.len(), 2);
    /// assert_eq!(table.rows()[1].get(1), Some("5,00"));
    /// # Ok::<(), statement_normalizer::Error>(())
    /// ```
    pub fn from_text(text: &str, delimiter: Option<u8>) -> Result<Self> {
        let text = text.trim_start_matches('\u{feff}');
        let delimiter = delimiter.unwrap_or_else(|| detect_delimiter(text));
        debug!(delimiter = %char::from(delimiter).escape_default(), "reading table");

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(text.as_bytes());

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let row: Row = record.iter().collect();

            // Skip empty rows
            if row.is_blank() {
                continue;
            }
            rows.push(row);
        }

        Ok(RawTable::new(rows))
    }

    /// Read all of `reader` and parse it with [`RawTable::from_text`].
    pub fn from_read<R: Read>(reader: &mut R, delimiter: Option<u8>) -> Result<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Self::from_text(&text, delimiter)
    }
}

/// Pick the candidate delimiter seen most often outside quotes in the first
/// records. Quote state carries across line breaks, so a quoted field spanning
/// lines stays one record. Ties go to the earlier candidate; no hits at all
/// means comma.
fn detect_delimiter(text: &str) -> u8 {
    let mut counts = [0usize; CANDIDATE_DELIMITERS.len()];
    let mut in_quotes = false;
    let mut records = 0;
    let mut record_has_content = false;

    for byte in text.bytes() {
        match byte {
            b'"' => {
                in_quotes = !in_quotes;
                record_has_content = true;
            }
            b'\n' if !in_quotes => {
                if record_has_content {
                    records += 1;
                    if records == SNIFF_RECORDS {
                        break;
                    }
                }
                record_has_content = false;
            }
            _ if in_quotes => {}
            _ => {
                if let Some(i) = CANDIDATE_DELIMITERS.iter().position(|d| *d == byte) {
                    counts[i] += 1;
                }
                if !byte.is_ascii_whitespace() {
                    record_has_content = true;
                }
            }
        }
    }

    let best = counts
        .iter()
        .enumerate()
        .fold(0, |best, (i, count)| if *count > counts[best] { i } else { best });
    CANDIDATE_DELIMITERS[best]
}
